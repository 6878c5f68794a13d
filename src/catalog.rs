// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Activity Catalog
//!
//! Static registry of priced transfer templates. Each [`Activity`] fixes the
//! direction of the coins (club to student or student to club) and a
//! category. The transfer core only reads from the catalog.
//!
//! A missing activity is reported as [`CatalogError::NotFound`]; callers
//! decide whether to fall back to a free-form transfer.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

/// Which role pays and which role receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Rewards and grants paid out by a club.
    ClubToStudent,
    /// Fees, fines and purchases paid by a student.
    StudentToClub,
}

impl Direction {
    /// Role of the paying party.
    pub fn sender_role(self) -> Role {
        match self {
            Direction::ClubToStudent => Role::Club,
            Direction::StudentToClub => Role::Student,
        }
    }

    /// Role of the receiving party.
    pub fn receiver_role(self) -> Role {
        match self {
            Direction::ClubToStudent => Role::Student,
            Direction::StudentToClub => Role::Club,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::ClubToStudent => "club_to_student",
            Direction::StudentToClub => "student_to_club",
        }
    }

    /// Parse the wire name (`club_to_student` / `student_to_club`).
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim() {
            "club_to_student" => Some(Direction::ClubToStudent),
            "student_to_club" => Some(Direction::StudentToClub),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Event,
    Purchase,
    Membership,
    Donation,
    Penalty,
    Reward,
}

/// A named, pre-priced transfer template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Activity {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Price in whole coins, always > 0.
    pub amount: u64,
    pub direction: Direction,
    pub category: Category,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("activity `{0}` not found")]
    NotFound(String),
}

/// Read-only activity registry.
#[derive(Debug, Clone)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
}

impl ActivityCatalog {
    /// Catalog over an explicit set of activities.
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    /// The predefined campus catalog.
    pub fn predefined() -> Self {
        Self::new(PREDEFINED_ACTIVITIES.to_vec())
    }

    /// Active activities, optionally restricted to one direction.
    pub fn list_activities(&self, direction: Option<Direction>) -> Vec<Activity> {
        self.activities
            .iter()
            .filter(|a| a.active)
            .filter(|a| direction.is_none_or(|d| a.direction == d))
            .cloned()
            .collect()
    }

    /// Active activities of one category.
    pub fn list_by_category(&self, category: Category) -> Vec<Activity> {
        self.activities
            .iter()
            .filter(|a| a.active && a.category == category)
            .cloned()
            .collect()
    }

    /// Look up an activity by id. Inactive entries are still returned so
    /// callers can report them precisely.
    pub fn get_activity(&self, id: &str) -> Result<&Activity, CatalogError> {
        self.activities
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Activities a caller of the given role can act on.
    ///
    /// Clubs operate the scanner and run every kind of activity. Students
    /// only see what they can be charged for.
    pub fn applicable_activities(&self, role: Role) -> Vec<Activity> {
        match role {
            Role::Club => self.list_activities(None),
            Role::Student => self.list_activities(Some(Direction::StudentToClub)),
        }
    }
}

impl Default for ActivityCatalog {
    fn default() -> Self {
        Self::predefined()
    }
}

const fn activity(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    amount: u64,
    direction: Direction,
    category: Category,
) -> Activity {
    Activity {
        id,
        title,
        description,
        amount,
        direction,
        category,
        active: true,
    }
}

pub const PREDEFINED_ACTIVITIES: [Activity; 15] = [
    // Club to student: rewards and grants
    activity(
        "act_001",
        "Event participation reward",
        "Paid to students who took an active part in a school event or club activity",
        500,
        Direction::ClubToStudent,
        Category::Reward,
    ),
    activity(
        "act_002",
        "Outstanding activity grant",
        "Paid to students whose club activity set an example for others",
        1000,
        Direction::ClubToStudent,
        Category::Reward,
    ),
    activity(
        "act_003",
        "Competition entry support",
        "Support for entering competitions and contests",
        2000,
        Direction::ClubToStudent,
        Category::Event,
    ),
    activity(
        "act_004",
        "Study material support",
        "Support for buying textbooks and study material",
        1500,
        Direction::ClubToStudent,
        Category::Purchase,
    ),
    activity(
        "act_005",
        "Project completion reward",
        "Paid to teams that completed a club project",
        3000,
        Direction::ClubToStudent,
        Category::Reward,
    ),
    // Student to club: fees, fines and purchases
    activity(
        "act_006",
        "Club dues",
        "Monthly dues for running the club",
        5000,
        Direction::StudentToClub,
        Category::Membership,
    ),
    activity(
        "act_007",
        "Event entry fee",
        "Entry fee for club events and workshops",
        3000,
        Direction::StudentToClub,
        Category::Event,
    ),
    activity(
        "act_008",
        "Equipment fee",
        "Fee for using club equipment or facilities",
        1000,
        Direction::StudentToClub,
        Category::Purchase,
    ),
    activity(
        "act_009",
        "Textbook fee",
        "Textbooks and material needed for club activities",
        2500,
        Direction::StudentToClub,
        Category::Purchase,
    ),
    activity(
        "act_010",
        "Late fine",
        "Charged for arriving late to a club session",
        500,
        Direction::StudentToClub,
        Category::Penalty,
    ),
    activity(
        "act_011",
        "Absence fine",
        "Charged for missing a club session without notice",
        1000,
        Direction::StudentToClub,
        Category::Penalty,
    ),
    activity(
        "act_012",
        "Voluntary donation",
        "Voluntary donation towards the club",
        2000,
        Direction::StudentToClub,
        Category::Donation,
    ),
    activity(
        "act_013",
        "Special event sponsorship",
        "Sponsorship for hosting a special club event or contest",
        5000,
        Direction::StudentToClub,
        Category::Donation,
    ),
    activity(
        "act_014",
        "Snack fee",
        "Snacks and refreshments during club sessions",
        1500,
        Direction::StudentToClub,
        Category::Purchase,
    ),
    activity(
        "act_015",
        "Membership training fee",
        "Entry fee for the club membership training retreat",
        10000,
        Direction::StudentToClub,
        Category::Event,
    ),
];
