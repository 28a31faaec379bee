use std::fmt;

/// Identifies one camera acquisition request. Strictly increasing per workflow.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraStatus {
    /// Not yet requested.
    #[default]
    Idle,
    Requesting {
        request: RequestId,
    },
    /// A live stream is held by the engine and bound to the viewfinder.
    Active {
        request: RequestId,
    },
    /// Stream stopped after a capture, a file selection or teardown.
    Released,
    Unavailable(CameraFailure),
}

impl CameraStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CameraStatus::Active { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, CameraStatus::Unavailable(_))
    }

    /// Request id of the acquisition currently pending or holding the stream.
    pub fn current_request(&self) -> Option<RequestId> {
        match self {
            CameraStatus::Requesting { request } | CameraStatus::Active { request } => {
                Some(*request)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraFailure {
    Denied,
    NoDevice,
    Unsupported,
    Device(String),
}

impl fmt::Display for CameraFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraFailure::Denied => write!(f, "permission denied"),
            CameraFailure::NoDevice => write!(f, "no camera device"),
            CameraFailure::Unsupported => write!(f, "camera capability absent"),
            CameraFailure::Device(message) => write!(f, "device error: {message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFailure {
    Denied,
    Unsupported,
    Timeout,
    NoSignal,
    /// The device reported coordinates that are not finite.
    Invalid,
}

impl fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationFailure::Denied => write!(f, "permission denied"),
            LocationFailure::Unsupported => write!(f, "geolocation capability absent"),
            LocationFailure::Timeout => write!(f, "timed out"),
            LocationFailure::NoSignal => write!(f, "no position available"),
            LocationFailure::Invalid => write!(f, "invalid coordinates"),
        }
    }
}

/// A finite latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Returns `None` when either component is NaN or infinite.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Formats coordinates as the `"lat, lng"` badge label with four decimals.
pub fn format_coordinates(coordinates: Coordinates) -> String {
    format!(
        "{:.4}, {:.4}",
        coordinates.latitude(),
        coordinates.longitude()
    )
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationFix {
    #[default]
    Requesting,
    Resolved {
        coordinates: Coordinates,
        display_name: String,
        /// Set when the fix is a fallback value rather than a device report.
        is_approximate: bool,
    },
    Unavailable(LocationFailure),
}

impl LocationFix {
    pub fn is_requesting(&self) -> bool {
        matches!(self, LocationFix::Requesting)
    }

    pub fn is_approximate(&self) -> bool {
        matches!(
            self,
            LocationFix::Resolved {
                is_approximate: true,
                ..
            }
        )
    }
}
