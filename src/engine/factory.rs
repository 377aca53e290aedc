//! Instance factory: builds the one instance a suite gets per run.

use std::any::Any;

use crate::errors::ConstructionError;
use crate::suite::SuiteType;

/// A constructed suite object together with the descriptor it was built from.
pub struct SuiteInstance<'a> {
    suite: &'a SuiteType,
    object: Box<dyn Any>,
}

impl<'a> SuiteInstance<'a> {
    pub fn suite(&self) -> &'a SuiteType {
        self.suite
    }

    pub fn object(&self) -> &dyn Any {
        self.object.as_ref()
    }

    pub(crate) fn object_mut(&mut self) -> &mut dyn Any {
        self.object.as_mut()
    }
}

/// Construct a fresh instance of `suite` through its registered no-argument constructor.
///
/// ## Errors
/// - [`ConstructionError::NoConstructor`] if none was registered.
/// - [`ConstructionError::Raised`] if the constructor returned a failure.
pub fn construct(suite: &SuiteType) -> Result<SuiteInstance<'_>, ConstructionError> {
    let constructor = suite
        .constructor()
        .ok_or(ConstructionError::NoConstructor { suite: suite.name() })?;
    let object = constructor().map_err(|failure| ConstructionError::Raised {
        suite: suite.name(),
        failure,
    })?;
    Ok(SuiteInstance { suite, object })
}
