//! Error taxonomy (§7): the fixed set of error kinds a reconciliation run
//! can surface, propagated by `?` and never by panic.
use std::fmt;

use crate::ids::ResourceKind;
use crate::reconciler::ReconciliationResult;

/// A field failed validation before being accepted into the merged catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub value: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed for field {:?} (value {:?}): {}",
            self.field, self.value, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// A source rejected the credentials or method used to authenticate it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationError {
    pub provider: String,
    pub method: String,
    pub message: String,
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "authentication failed for provider {:?} via {:?}: {}",
            self.provider, self.method, self.message
        )
    }
}

impl std::error::Error for AuthenticationError {}

/// A component was configured in a way it cannot operate under.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationError {
    pub component: String,
    pub message: String,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error in {:?}: {}", self.component, self.message)
    }
}

impl std::error::Error for ConfigurationError {}

/// A source failed to fetch or otherwise synchronize its data.
#[derive(Debug)]
pub struct SyncError {
    pub provider: String,
    pub inner: Box<dyn std::error::Error + Send + Sync>,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sync failed for provider {:?}: {}", self.provider, self.inner)
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

/// An operation on a specific resource (kind, id) failed.
#[derive(Debug)]
pub struct ResourceError {
    pub operation: String,
    pub kind: ResourceKind,
    pub id: String,
    pub inner: Box<dyn std::error::Error + Send + Sync>,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed for {} {:?}: {}",
            self.operation, self.kind, self.id, self.inner
        )
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

/// Errors a [`crate::reconciler::Reconciler`] run can fail with (§4.8, §7:
/// "validation/assembly errors are fatal").
#[derive(Debug)]
pub enum ReconcileError {
    /// The configured primary source id has no entry among the provided
    /// sources (§4.8 step 1, "unknown primary id").
    UnknownPrimarySource(String),
    /// A source the configuration names was not supplied to `reconcile`
    /// (§4.8 step 1, "missing sources").
    MissingSource(String),
    /// The primary source produced no catalog at all.
    PrimarySourceUnavailable(String),
    /// A reconciliation was cancelled mid-run via its `FetchContext` (§5).
    /// Carries whatever partial result had been assembled up to the point
    /// of cancellation, per the requirement that a cancelled run still
    /// yields the partial catalog rather than nothing.
    Cancelled(Box<ReconciliationResult>),
    Validation(ValidationError),
    Configuration(ConfigurationError),
    Resource(ResourceError),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPrimarySource(id) => {
                write!(f, "configured primary source {id:?} is not among the provided sources")
            }
            Self::MissingSource(id) => write!(f, "required source {id:?} was not supplied"),
            Self::PrimarySourceUnavailable(id) => {
                write!(f, "primary source {id:?} produced no catalog")
            }
            Self::Cancelled(_) => write!(f, "reconciliation was cancelled"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Configuration(e) => write!(f, "{e}"),
            Self::Resource(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Configuration(e) => Some(e),
            Self::Resource(e) => Some(e),
            Self::UnknownPrimarySource(_)
            | Self::MissingSource(_)
            | Self::PrimarySourceUnavailable(_)
            | Self::Cancelled(_) => None,
        }
    }
}

impl From<ValidationError> for ReconcileError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ConfigurationError> for ReconcileError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<ResourceError> for ReconcileError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

/// A source's `fetch` failed (§6, the `Source` contract).
#[derive(Debug)]
pub struct SourceError {
    pub source: String,
    pub inner: Box<dyn std::error::Error + Send + Sync>,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source {:?} failed: {}", self.source, self.inner)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}
