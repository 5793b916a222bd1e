use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::EntityType;

pub mod commands;

#[derive(Parser)]
#[command(name = "calricula")]
#[command(about = "Course and program approval workflow viewer for Calricula")]
#[command(long_about = "Shows where a Course Outline of Record or program sits in the approval \
                       workflow (Draft, Department Review, Curriculum Committee, Articulation Review, \
                       Approved) and the history of its status changes.")]
pub struct Cli {
    /// Configuration file (defaults to calricula.toml / .calricula-rc)
    #[arg(long, global = true, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,

    /// Print views as JSON instead of text
    #[arg(long, global = true, help = "Emit machine-readable JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the workflow statuses in order
    Statuses,
    /// Render the progress bar for a status
    Progress {
        /// Current status (Draft, DeptReview, CurriculumCommittee, ArticulationReview, Approved)
        status: String,
        /// Use the compact linear bar with a percentage
        #[arg(long, help = "Render the compact linear bar")]
        compact: bool,
        /// Hide step labels
        #[arg(long, help = "Render markers only")]
        hide_labels: bool,
    },
    /// Show the workflow history of a course or program
    History {
        #[arg(value_enum)]
        kind: EntityType,
        id: String,
    },
    /// Show the detail page (status, progress, actions, history) of a course or program
    Show {
        #[arg(value_enum)]
        kind: EntityType,
        id: String,
        /// Use the compact linear bar with a percentage
        #[arg(long, help = "Render the compact linear bar")]
        compact: bool,
    },
}
