use std::sync::Arc;

use log::{debug, error, info};

use crate::{
    accessor::{CommandAccessor, Coordinates, LocationAccessor},
    error::{LocationError, LocationErrorCode, LocationFinderError, NativeError},
};

/// Async front end for a [`LocationAccessor`].
///
/// Each call to [`LocationFinder::get_location`] runs the accessor once on tokio's blocking
/// pool. Calls are independent: nothing is cached, retried, or shared besides the
/// accessor itself. Must be polled inside a tokio runtime.
pub struct LocationFinder<A> {
    accessor: Arc<A>,
}

impl<A> Clone for LocationFinder<A> {
    fn clone(&self) -> Self {
        LocationFinder {
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<A: LocationAccessor> LocationFinder<A> {
    pub fn new(accessor: A) -> Self {
        LocationFinder {
            accessor: Arc::new(accessor),
        }
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub async fn get_location(&self) -> Result<A::Output, LocationFinderError> {
        let accessor = Arc::clone(&self.accessor);
        debug!("Requesting location from native accessor");
        let result = tokio::task::spawn_blocking(move || accessor.get_location())
            .await
            .map_err(|err| {
                error!("Location task failed: {}", err);
                LocationFinderError::from(err)
            })?;
        let location = result.map_err(translate_native_error)?;
        debug!("Native accessor returned a location");
        Ok(location)
    }
}

/// Maps a native failure onto a [`LocationError`] when its identifier is a known code,
/// otherwise hands it back untouched.
pub fn translate_native_error(native: NativeError) -> LocationFinderError {
    match LocationErrorCode::from_native(&native.message) {
        Some(code) => {
            info!("Location request failed: {}", code);
            LocationFinderError::Location(LocationError::new(code, native.extra))
        }
        None => {
            error!("Unrecognized native location error: {}", native);
            LocationFinderError::Native(native)
        }
    }
}

/// Current location from the process-wide helper, see
/// [`set_location_helper`](crate::accessor::set_location_helper).
pub async fn get_location() -> Result<Coordinates, LocationFinderError> {
    LocationFinder::new(CommandAccessor::from_config())
        .get_location()
        .await
}
