//! Team model.

use crate::models::User;
use serde::{Deserialize, Serialize};

/// A named group of users sharing review duties.
///
/// The team name is the primary key; teams are created once and never
/// renamed. Members are loaded with the team on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<User>,
}
