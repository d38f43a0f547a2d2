//! Property snapshots recorded alongside operations.
//!
//! A property set is a `(target, property, value)` triple. The log keeps
//! only a [`Weak`] reference to the target: keeping the object alive is its
//! owner's job. When the set is applied, the value's [`PropertyType`] is
//! checked against the type the target declares and assigned verbatim.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::error::{ActionLogError, ActionLogResult, OperationError, OperationResult};

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Int,
    Float,
    Bool,
    Str,
    Handle,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Handle => "handle",
        };
        f.write_str(name)
    }
}

/// Opaque identifier for a host-side resource (mesh, texture, chunk...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpaqueHandle(pub u64);

/// A dynamically typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Handle(OpaqueHandle),
}

impl PropertyValue {
    /// Returns the type tag of this value.
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Int(_) => PropertyType::Int,
            Self::Float(_) => PropertyType::Float,
            Self::Bool(_) => PropertyType::Bool,
            Self::Str(_) => PropertyType::Str,
            Self::Handle(_) => PropertyType::Handle,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<OpaqueHandle> {
        match self {
            Self::Handle(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<OpaqueHandle> for PropertyValue {
    fn from(v: OpaqueHandle) -> Self {
        Self::Handle(v)
    }
}

/// An object whose named properties can be assigned by the action log.
///
/// # Example
///
/// ```ignore
/// struct Chunk { dirty: bool }
///
/// impl PropertyTarget for Chunk {
///     fn property_type(&self, property: &str) -> Option<PropertyType> {
///         (property == "dirty").then_some(PropertyType::Bool)
///     }
///
///     fn set_property(&mut self, _property: &str, value: PropertyValue) -> OperationResult {
///         self.dirty = value.as_bool().unwrap_or_default();
///         Ok(())
///     }
/// }
/// ```
pub trait PropertyTarget: 'static {
    /// Declared type of `property`, or `None` if the target has no such property.
    fn property_type(&self, property: &str) -> Option<PropertyType>;

    /// Assigns `value` to `property`.
    ///
    /// Only called after the value's type was checked against
    /// [`property_type`](Self::property_type).
    fn set_property(&mut self, property: &str, value: PropertyValue) -> OperationResult;
}

/// A recorded `(target, property, value)` triple.
pub(crate) struct PropertySet {
    target: Weak<RefCell<dyn PropertyTarget>>,
    property: String,
    value: PropertyValue,
}

impl PropertySet {
    pub(crate) fn new<T: PropertyTarget>(
        target: &Rc<RefCell<T>>,
        property: String,
        value: PropertyValue,
    ) -> Self {
        let target: Weak<RefCell<T>> = Rc::downgrade(target);
        Self {
            target,
            property,
            value,
        }
    }

    /// Assigns the recorded value. `action` names the owning action in errors.
    pub(crate) fn apply(&self, action: &str) -> ActionLogResult {
        let target = self
            .target
            .upgrade()
            .ok_or_else(|| ActionLogError::TargetDropped {
                action: action.to_owned(),
                property: self.property.clone(),
            })?;
        let mut target = target
            .try_borrow_mut()
            .map_err(|_| ActionLogError::OperationFailed {
                action: action.to_owned(),
                source: OperationError::InvalidState(format!(
                    "target of property '{}' is already borrowed",
                    self.property
                )),
            })?;

        let expected =
            target
                .property_type(&self.property)
                .ok_or_else(|| ActionLogError::UnknownProperty {
                    action: action.to_owned(),
                    property: self.property.clone(),
                })?;
        let found = self.value.property_type();
        if expected != found {
            return Err(ActionLogError::PropertyTypeMismatch {
                action: action.to_owned(),
                property: self.property.clone(),
                expected,
                found,
            });
        }

        target
            .set_property(&self.property, self.value.clone())
            .map_err(|source| ActionLogError::OperationFailed {
                action: action.to_owned(),
                source,
            })
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySet")
            .field("property", &self.property)
            .field("value", &self.value)
            .field("target_alive", &(self.target.strong_count() > 0))
            .finish()
    }
}
