//! Object lifecycle management rules.

use std::fmt;

use time::Date;

use crate::http::storage_class;
use crate::http::Error;

/// Lifecycle properties of a bucket.
/// For more information, see <https://cloud.google.com/storage/docs/lifecycle.>
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
pub struct BucketLifecycle {
    #[serde(default)]
    pub rule: Vec<LifecycleRule>,
}

/// A lifecycle rule, combining an action to take on an object and a condition which will
/// trigger that action.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
pub struct LifecycleRule {
    #[serde(default)]
    action: LifecycleRuleAction,
    #[serde(default)]
    condition: LifecycleRuleCondition,
}

/// An action to take on an object.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRuleAction {
    #[serde(default, rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_class: String,
}

/// A condition of an object which triggers some action. All the fields that are set must hold.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRuleCondition {
    /// Age of an object in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, with = "crate::http::date", skip_serializing_if = "Option::is_none")]
    pub created_before: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_live: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches_storage_class: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_newer_versions: Option<i32>,
}

impl LifecycleRule {
    pub fn new(condition: LifecycleRuleCondition, action: LifecycleRuleAction) -> Self {
        Self { action, condition }
    }

    pub fn action(&self) -> &LifecycleRuleAction {
        &self.action
    }

    pub fn condition(&self) -> &LifecycleRuleCondition {
        &self.condition
    }

    pub fn max_age(days: i32) -> LifecycleRuleCondition {
        LifecycleRuleCondition {
            age: Some(days),
            ..Default::default()
        }
    }

    pub fn created_before(date: Date) -> LifecycleRuleCondition {
        LifecycleRuleCondition {
            created_before: Some(date),
            ..Default::default()
        }
    }

    pub fn is_live(value: bool) -> LifecycleRuleCondition {
        LifecycleRuleCondition {
            is_live: Some(value),
            ..Default::default()
        }
    }

    pub fn matches_storage_class(classes: impl IntoIterator<Item = impl Into<String>>) -> LifecycleRuleCondition {
        LifecycleRuleCondition {
            matches_storage_class: Some(classes.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn matches_storage_class_standard() -> LifecycleRuleCondition {
        Self::matches_storage_class([storage_class::STANDARD])
    }

    pub fn matches_storage_class_multi_regional() -> LifecycleRuleCondition {
        Self::matches_storage_class([storage_class::MULTI_REGIONAL])
    }

    pub fn matches_storage_class_regional() -> LifecycleRuleCondition {
        Self::matches_storage_class([storage_class::REGIONAL])
    }

    pub fn matches_storage_class_nearline() -> LifecycleRuleCondition {
        Self::matches_storage_class([storage_class::NEARLINE])
    }

    pub fn matches_storage_class_coldline() -> LifecycleRuleCondition {
        Self::matches_storage_class([storage_class::COLDLINE])
    }

    pub fn matches_storage_class_durable_reduced_availability() -> LifecycleRuleCondition {
        Self::matches_storage_class([storage_class::DURABLE_REDUCED_AVAILABILITY])
    }

    pub fn num_newer_versions(count: i32) -> LifecycleRuleCondition {
        LifecycleRuleCondition {
            num_newer_versions: Some(count),
            ..Default::default()
        }
    }

    pub fn delete() -> LifecycleRuleAction {
        LifecycleRuleAction {
            action_type: "Delete".to_string(),
            storage_class: String::new(),
        }
    }

    pub fn set_storage_class(class: impl Into<String>) -> LifecycleRuleAction {
        LifecycleRuleAction {
            action_type: "SetStorageClass".to_string(),
            storage_class: class.into(),
        }
    }

    pub fn set_storage_class_standard() -> LifecycleRuleAction {
        Self::set_storage_class(storage_class::STANDARD)
    }

    pub fn set_storage_class_multi_regional() -> LifecycleRuleAction {
        Self::set_storage_class(storage_class::MULTI_REGIONAL)
    }

    pub fn set_storage_class_regional() -> LifecycleRuleAction {
        Self::set_storage_class(storage_class::REGIONAL)
    }

    pub fn set_storage_class_nearline() -> LifecycleRuleAction {
        Self::set_storage_class(storage_class::NEARLINE)
    }

    pub fn set_storage_class_coldline() -> LifecycleRuleAction {
        Self::set_storage_class(storage_class::COLDLINE)
    }

    pub fn set_storage_class_durable_reduced_availability() -> LifecycleRuleAction {
        Self::set_storage_class(storage_class::DURABLE_REDUCED_AVAILABILITY)
    }

    /// Merges `conditions` into one condition that holds only when all of them hold.
    ///
    /// Ages and version counts keep the largest value, `created_before` the earliest date and
    /// storage classes the classes common to every condition. Conditions that disagree on
    /// `is_live` cannot be combined.
    pub fn condition_conjunction(
        conditions: impl IntoIterator<Item = LifecycleRuleCondition>,
    ) -> Result<LifecycleRuleCondition, Error> {
        let mut result = LifecycleRuleCondition::default();
        for condition in conditions {
            result.age = max_option(result.age, condition.age);
            result.num_newer_versions = max_option(result.num_newer_versions, condition.num_newer_versions);
            result.created_before = match (result.created_before, condition.created_before) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            result.is_live = match (result.is_live, condition.is_live) {
                (Some(a), Some(b)) if a != b => {
                    return Err(Error::InvalidArgument(
                        "cannot combine conditions with different is_live values".to_string(),
                    ))
                }
                (a, b) => a.or(b),
            };
            result.matches_storage_class = match (result.matches_storage_class, condition.matches_storage_class) {
                (Some(a), Some(b)) => Some(a.into_iter().filter(|c| b.contains(c)).collect()),
                (a, b) => a.or(b),
            };
        }
        Ok(result)
    }
}

fn max_option(a: Option<i32>, b: Option<i32>) -> Option<i32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

impl fmt::Display for LifecycleRuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        f.write_str("LifecycleRuleCondition={")?;
        if let Some(age) = self.age {
            write!(f, "{sep}age={age}")?;
            sep = ", ";
        }
        if let Some(date) = &self.created_before {
            let text = date.format(crate::http::date::FORMAT).map_err(|_| fmt::Error)?;
            write!(f, "{sep}created_before={text}")?;
            sep = ", ";
        }
        if let Some(is_live) = self.is_live {
            write!(f, "{sep}is_live={is_live}")?;
            sep = ", ";
        }
        if let Some(classes) = &self.matches_storage_class {
            write!(f, "{sep}matches_storage_class=[{}]", classes.join(", "))?;
            sep = ", ";
        }
        if let Some(count) = self.num_newer_versions {
            write!(f, "{sep}num_newer_versions={count}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for LifecycleRuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LifecycleRuleAction={{{}", self.action_type)?;
        if !self.storage_class.is_empty() {
            write!(f, ", storage_class={}", self.storage_class)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for LifecycleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LifecycleRule={{condition={}, action={}}}", self.condition, self.action)
    }
}
