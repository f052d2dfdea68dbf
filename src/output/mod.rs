pub mod formatter;

pub use formatter::{
    format_activity_list, format_distribution_preview, format_leaderboard, format_leaderboard_tsv,
    format_resolution, format_roster, should_use_colors,
};
