pub mod accessor;
pub mod error;
pub mod location_finder;

pub use accessor::{
    location_helper, set_location_helper, CommandAccessor, Coordinates, HelperCommand,
    LocationAccessor,
};
pub use error::{LocationError, LocationErrorCode, LocationFinderError, NativeError};
pub use location_finder::{get_location, translate_native_error, LocationFinder};
