//! Table discovery by naming convention (Functional Core - pure functions).
//!
//! Amplify names tables `<Model>-<apiId>-<env>`, so the cleanup finds its
//! tables by substring match on the model name. Any role can be pinned to an
//! explicit table name instead, which skips matching for that role.

use std::fmt;

/// The part a table plays in a cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableRole {
    /// Holds the user records.
    Primary,
    /// Holds subscriptions referenced from user records.
    Subscription,
    /// Holds records owned by a user through an owner field (essays).
    Dependent,
}

impl TableRole {
    pub const ALL: [TableRole; 3] = [
        TableRole::Primary,
        TableRole::Subscription,
        TableRole::Dependent,
    ];

    /// Whether the last matching table in listing order is chosen for this
    /// role. The essay table takes the first match.
    pub fn prefers_last(self) -> bool {
        !matches!(self, TableRole::Dependent)
    }
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRole::Primary => write!(f, "User"),
            TableRole::Subscription => write!(f, "UserSubscription"),
            TableRole::Dependent => write!(f, "Essay"),
        }
    }
}

/// Substring rule: the name must contain `contains` and must not contain
/// `excludes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRule {
    pub contains: String,
    pub excludes: Option<String>,
}

impl NameRule {
    pub fn new(contains: &str) -> Self {
        Self {
            contains: contains.to_string(),
            excludes: None,
        }
    }

    pub fn excluding(mut self, excludes: &str) -> Self {
        self.excludes = Some(excludes.to_string());
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        name.contains(&self.contains)
            && !self
                .excludes
                .as_deref()
                .is_some_and(|excluded| name.contains(excluded))
    }
}

/// Naming rules for each table role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConventions {
    pub primary: NameRule,
    pub subscription: NameRule,
    pub dependent: NameRule,
}

impl Default for TableConventions {
    fn default() -> Self {
        Self {
            primary: NameRule::new("User").excluding("UserSubscription"),
            subscription: NameRule::new("UserSubscription"),
            dependent: NameRule::new("Essay").excluding("Result"),
        }
    }
}

impl TableConventions {
    pub fn rule(&self, role: TableRole) -> &NameRule {
        match role {
            TableRole::Primary => &self.primary,
            TableRole::Subscription => &self.subscription,
            TableRole::Dependent => &self.dependent,
        }
    }

    /// Every role whose rule matches `name`. The rules are independent, so a
    /// name like `UserEssay-...` matches more than one role.
    pub fn roles_for(&self, name: &str) -> Vec<TableRole> {
        TableRole::ALL
            .into_iter()
            .filter(|role| self.rule(*role).matches(name))
            .collect()
    }
}

/// Explicit table names that take precedence over discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOverrides {
    pub primary: Option<String>,
    pub subscription: Option<String>,
    pub dependent: Option<String>,
}

impl TableOverrides {
    pub fn get(&self, role: TableRole) -> Option<&str> {
        match role {
            TableRole::Primary => self.primary.as_deref(),
            TableRole::Subscription => self.subscription.as_deref(),
            TableRole::Dependent => self.dependent.as_deref(),
        }
    }

    /// True when every role is pinned, so no table listing is needed.
    pub fn is_complete(&self) -> bool {
        TableRole::ALL.iter().all(|role| self.get(*role).is_some())
    }
}

/// Every listed table name that matched each role, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub primary: Vec<String>,
    pub subscription: Vec<String>,
    pub dependent: Vec<String>,
}

impl Candidates {
    pub fn for_role(&self, role: TableRole) -> &[String] {
        match role {
            TableRole::Primary => &self.primary,
            TableRole::Subscription => &self.subscription,
            TableRole::Dependent => &self.dependent,
        }
    }

    /// The candidate discovery settles on for `role`.
    pub fn chosen(&self, role: TableRole) -> Option<&str> {
        let names = self.for_role(role);
        let name = if role.prefers_last() {
            names.last()
        } else {
            names.first()
        };
        name.map(String::as_str)
    }

    fn push(&mut self, role: TableRole, name: &str) {
        let bucket = match role {
            TableRole::Primary => &mut self.primary,
            TableRole::Subscription => &mut self.subscription,
            TableRole::Dependent => &mut self.dependent,
        };
        bucket.push(name.to_string());
    }
}

/// Pure function: sort table names into role candidates.
pub fn classify_tables(names: &[String], conventions: &TableConventions) -> Candidates {
    let mut candidates = Candidates::default();
    for name in names {
        for role in conventions.roles_for(name) {
            candidates.push(role, name);
        }
    }
    candidates
}

/// Roles that were not pinned and matched more than one table.
pub fn ambiguous_roles<'a>(
    candidates: &'a Candidates,
    overrides: &TableOverrides,
) -> Vec<(TableRole, &'a [String])> {
    TableRole::ALL
        .into_iter()
        .filter(|role| overrides.get(*role).is_none())
        .map(|role| (role, candidates.for_role(role)))
        .filter(|(_, names)| names.len() > 1)
        .collect()
}

/// The table chosen for each role, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelection {
    pub primary: Option<String>,
    pub subscription: Option<String>,
    pub dependent: Option<String>,
}

impl TableSelection {
    /// Pure function: overrides win, otherwise [`Candidates::chosen`] is taken.
    pub fn select(candidates: &Candidates, overrides: &TableOverrides) -> Self {
        let pick = |role: TableRole| {
            overrides
                .get(role)
                .or_else(|| candidates.chosen(role))
                .map(str::to_string)
        };

        Self {
            primary: pick(TableRole::Primary),
            subscription: pick(TableRole::Subscription),
            dependent: pick(TableRole::Dependent),
        }
    }

    pub fn get(&self, role: TableRole) -> Option<&str> {
        match role {
            TableRole::Primary => self.primary.as_deref(),
            TableRole::Subscription => self.subscription.as_deref(),
            TableRole::Dependent => self.dependent.as_deref(),
        }
    }
}
