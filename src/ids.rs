use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Index types
// ---------------------------------------------------------------------------

macro_rules! idx {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

idx!(
    /// Identifies a camera in the manifest. Ordering is the tie-break order
    /// for coincident cameras.
    CameraId(u64)
);

idx!(
    /// Identifies a street-network node by its external id.
    NodeId(u64)
);

idx!(
    /// Index of a zone within one resolution level (`0..num_zones`).
    ZoneId(u32)
);

impl ZoneId {
    #[inline] pub fn index(self) -> usize { self.0 as usize }
}
