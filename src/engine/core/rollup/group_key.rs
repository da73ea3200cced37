use std::fmt;

use serde::{Serialize, Serializer};

use crate::engine::types::KEY_SEPARATOR;

/// Key used when a plan declares no dimensions: the whole pass folds into one bucket.
pub const GLOBAL_GROUP: &str = "all";

/// Composite bucket identifier: dimension values joined by [`KEY_SEPARATOR`].
///
/// Normalized text never contains the separator, so distinct value tuples never
/// collide after the join.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        let mut any = false;
        for part in parts {
            if any {
                joined.push(KEY_SEPARATOR);
            }
            joined.push_str(part.as_ref());
            any = true;
        }
        if !any {
            return Self::global();
        }
        GroupKey(joined)
    }

    pub fn global() -> Self {
        GroupKey(GLOBAL_GROUP.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parts(&self) -> Vec<&str> {
        self.0.split(KEY_SEPARATOR).collect()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts().join(" / "))
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
