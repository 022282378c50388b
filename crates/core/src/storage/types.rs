use std::collections::HashMap;

/// A stored record, reduced to its string attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    attributes: HashMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Gets a string attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Gets a string attribute, treating an empty value as absent.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

/// Partition key shared by every Amplify model table.
pub const KEY_ATTRIBUTE: &str = "id";

/// Attribute names the cleanup flow reads from records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub email_attribute: String,
    /// Field on the user record pointing at its subscription.
    pub subscription_attribute: String,
    /// Field on dependent records naming the owning user.
    pub owner_attribute: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            email_attribute: "email".to_string(),
            subscription_attribute: "subscriptionId".to_string(),
            owner_attribute: "userId".to_string(),
        }
    }
}
