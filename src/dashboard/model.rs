//! Dashboard model: a named, fixed-capacity list of elements.

use core::fmt;

use log::warn;
use heapless::String;
use thiserror::Error;

use crate::dashboard::element::{truncated, DashElement, ElementKind};

pub const MAX_ELEMENTS: usize = 32;

/// Longest dashboard name kept, in bytes.
pub const NAME_CAPACITY: usize = 128;

/// Position of an element in insertion order. Stable for the life of the
/// dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

impl ElementId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("dashboard already holds {} elements", MAX_ELEMENTS)]
    CapacityExceeded,
    #[error("no element {0}")]
    UnknownElement(ElementId),
}

pub struct Dashboard {
    name: String<NAME_CAPACITY>,
    elements: [Option<DashElement>; MAX_ELEMENTS],
    count: usize,
}

impl Dashboard {
    pub fn new(name: &str) -> Self {
        Self {
            name: truncated(name),
            elements: core::array::from_fn(|_| None),
            count: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub const fn capacity(&self) -> usize {
        MAX_ELEMENTS
    }

    /// Append `element`; it is drawn after every element added before it.
    pub fn add_element(&mut self, element: DashElement) -> Result<ElementId, DashboardError> {
        if self.count >= MAX_ELEMENTS {
            warn!(
                "dashboard '{}' is full, dropping {:?} element",
                self.name,
                element.kind()
            );
            return Err(DashboardError::CapacityExceeded);
        }

        let id = ElementId(self.count);
        if matches!(element.kind(), ElementKind::Gauge | ElementKind::Value)
            && element.has_degenerate_range()
        {
            warn!(
                "element {} has unusable range [{}, {}], it will always read 0%",
                id,
                element.min(),
                element.max()
            );
        }

        self.elements[self.count] = Some(element);
        self.count += 1;
        Ok(id)
    }

    pub fn update_value(&mut self, id: ElementId, value: f32) -> Result<(), DashboardError> {
        match self.elements[..self.count].get_mut(id.0) {
            Some(Some(element)) => {
                element.set_value(value);
                Ok(())
            }
            _ => Err(DashboardError::UnknownElement(id)),
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&DashElement> {
        self.elements[..self.count].get(id.0)?.as_ref()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &DashElement> + '_ {
        self.elements[..self.count].iter().flatten()
    }
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("name", &self.name)
            .field("elements", &self.count)
            .finish()
    }
}
