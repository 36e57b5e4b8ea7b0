use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// String identifier tagged with the kind of entity it names, so a callsign can
/// never be passed where an airport code is expected.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Serialize)]
pub struct Id<T> {
    pub id: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<Id<T>> for String {
    fn from(id_wrapper: Id<T>) -> Self {
        id_wrapper.id
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {:?}", display_name, self.id)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct CallsignTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct AirportTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct CapacityEventTag;

pub type Callsign = Id<CallsignTag>;
pub type AirportCode = Id<AirportTag>;
pub type CapacityEventId = Id<CapacityEventTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_uses_tag_name() {
        let callsign = Callsign::new("VN123");
        assert_eq!(format!("{:?}", callsign), "CallsignId: \"VN123\"");
        assert_eq!(callsign.to_string(), "VN123");
    }

    #[test]
    fn test_ordering_follows_string() {
        let mut callsigns = vec![Callsign::new("VJ200"), Callsign::new("BL100"), Callsign::new("VN050")];
        callsigns.sort();
        let names: Vec<&str> = callsigns.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["BL100", "VJ200", "VN050"]);
    }
}
