//! Leaderboard display model: rank tiers with their medal palette, display
//! names, avatars and the viewport-dependent number of visible rows.

use serde::Serialize;

use crate::model::entity::UserEntity;

/// Viewports at least this wide show the long leaderboard.
pub const WIDE_VIEWPORT_PX: u32 = 1920;
pub const WIDE_VISIBLE_ROWS: usize = 20;
pub const DEFAULT_VISIBLE_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedalPalette {
    pub medal_color: &'static str,
    pub ribbon_color: &'static str,
    pub text_color: &'static str,
    pub border_color: &'static str,
}

impl RankTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Self::Gold,
            2 => Self::Silver,
            3 => Self::Bronze,
            _ => Self::Plain,
        }
    }

    pub fn palette(&self) -> MedalPalette {
        match self {
            Self::Gold => MedalPalette {
                medal_color: "#FFD700",
                ribbon_color: "#FFA500",
                text_color: "#8B6914",
                border_color: "#B8860B",
            },
            Self::Silver => MedalPalette {
                medal_color: "#C0C0C0",
                ribbon_color: "#A0A0A0",
                text_color: "#555555",
                border_color: "#808080",
            },
            Self::Bronze => MedalPalette {
                medal_color: "#CD7F32",
                ribbon_color: "#A0522D",
                text_color: "#5D4E37",
                border_color: "#8B4513",
            },
            Self::Plain => MedalPalette {
                medal_color: "#E0E0E0",
                ribbon_color: "#CCCCCC",
                text_color: "#666666",
                border_color: "#AAAAAA",
            },
        }
    }

    pub fn has_medal(&self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// The subset of a user the leaderboard needs.
#[derive(Debug, Clone)]
pub struct LeaderboardUser {
    pub id: i32,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub level: i32,
    pub xp: i32,
}

impl From<&UserEntity> for LeaderboardUser {
    fn from(user: &UserEntity) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            first_name: user.first_name().map(str::to_string),
            last_name: user.last_name().map(str::to_string),
            level: user.level(),
            xp: user.xp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub user_id: i32,
    pub name: String,
    pub avatar: String,
    pub level: i32,
    pub xp: i32,
    pub xp_display: String,
    pub tier: RankTier,
    /// False for every rank below the podium.
    pub has_medal: bool,
    pub palette: MedalPalette,
    pub is_current_user: bool,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub max_visible: usize,
    pub entries: Vec<RankingEntry>,
}

/// "first last" when either part is present, the username otherwise.
pub fn display_name(user: &LeaderboardUser) -> String {
    let first = user.first_name.as_deref().unwrap_or_default();
    let last = user.last_name.as_deref().unwrap_or_default();
    let full = format!("{first} {last}");
    let full = full.trim();
    if full.is_empty() {
        user.username.clone()
    } else {
        full.to_string()
    }
}

pub fn avatar(username: &str) -> String {
    username
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| String::from("?"))
}

/// Formats XP with comma thousands separators, e.g. `12,345`.
pub fn format_xp(xp: i32) -> String {
    let digits = xp.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if xp < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn visible_rows(viewport_width: Option<u32>) -> usize {
    match viewport_width {
        Some(width) if width >= WIDE_VIEWPORT_PX => WIDE_VISIBLE_ROWS,
        _ => DEFAULT_VISIBLE_ROWS,
    }
}

/// Builds the ranking from users already ordered by XP. Rows past the
/// viewport cap are dropped.
pub fn build_ranking(
    users: &[LeaderboardUser],
    current_user: Option<i32>,
    viewport_width: Option<u32>,
) -> Ranking {
    let max_visible = visible_rows(viewport_width);
    let entries = users
        .iter()
        .take(max_visible)
        .enumerate()
        .map(|(idx, user)| {
            let rank = idx + 1;
            let tier = RankTier::for_rank(rank);
            RankingEntry {
                rank,
                user_id: user.id,
                name: display_name(user),
                avatar: avatar(&user.username),
                level: user.level,
                xp: user.xp,
                xp_display: format_xp(user.xp),
                tier,
                has_medal: tier.has_medal(),
                palette: tier.palette(),
                is_current_user: current_user == Some(user.id),
            }
        })
        .collect();

    Ranking {
        max_visible,
        entries,
    }
}
