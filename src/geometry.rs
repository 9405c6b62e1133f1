use serde::{Deserialize, Serialize};
use std::ops::{Add, Div};

pub trait PointLike {
    fn x(&self) -> f64;
    fn y(&self) -> f64;

    fn as_coord(&self) -> Coord {
        Coord {
            x: self.x(),
            y: self.y(),
        }
    }

    /// Euclidean distance between two planar points.
    fn distance<P: PointLike + ?Sized>(&self, other: &P) -> f64 {
        euclidean(self.as_coord(), other.as_coord())
    }
}

pub fn euclidean(a: Coord, b: Coord) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Coord { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of the given coordinates, `None` when there are none.
    pub fn mean<'a, P, I>(points: I) -> Option<Coord>
    where
        P: PointLike + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let (sum, count) = points
            .into_iter()
            .fold((Coord::default(), 0usize), |(sum, count), p| (sum + p.as_coord(), count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

impl PointLike for Coord {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Div<f64> for Coord {
    type Output = Coord;

    fn div(self, other: f64) -> Coord {
        Coord {
            x: self.x / other,
            y: self.y / other,
        }
    }
}

fn default_demand() -> u32 {
    1
}

/// A delivery order placed on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPoint {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_demand")]
    pub demand: u32,
}

impl DeliveryPoint {
    pub fn new(id: i64, x: f64, y: f64) -> Self {
        DeliveryPoint {
            id,
            x,
            y,
            demand: default_demand(),
        }
    }

    pub fn with_demand(mut self, demand: u32) -> Self {
        self.demand = demand;
        self
    }
}

impl PointLike for DeliveryPoint {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// A stop on a vehicle tour: the shared depot or one of the cluster's deliveries.
#[derive(Clone, Debug, PartialEq)]
pub enum Stop {
    Depot(Coord),
    Delivery(DeliveryPoint),
}

impl Stop {
    pub fn delivery_id(&self) -> Option<i64> {
        match self {
            Stop::Depot(_) => None,
            Stop::Delivery(point) => Some(point.id),
        }
    }

    pub fn is_depot(&self) -> bool {
        matches!(self, Stop::Depot(_))
    }
}

impl PointLike for Stop {
    fn x(&self) -> f64 {
        match self {
            Stop::Depot(coord) => coord.x,
            Stop::Delivery(point) => point.x,
        }
    }

    fn y(&self) -> f64 {
        match self {
            Stop::Depot(coord) => coord.y,
            Stop::Delivery(point) => point.y,
        }
    }
}
