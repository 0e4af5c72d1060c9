//! Output formatting

use clap::ValueEnum;
use isms_compliance::{Checklist, DashboardViewModel, GapPriority};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    pub fn dashboard(&self, view: &DashboardViewModel) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => Self::print_json(view),
            OutputFormat::Text => {
                let marker = if view.is_default { " (sample data)" } else { "" };
                println!("Overall compliance: {}%{}", view.overall_score, marker);
                println!("Controls compliant: {}/{}", view.controls_compliant, view.total_controls);
                println!("Critical gaps:      {}", view.critical_gaps);
                println!("Maturity:           Level {} - {}", view.maturity_level, view.maturity_label);
                if !view.top_gaps.is_empty() {
                    println!();
                    println!("Top gaps:");
                    for gap in &view.top_gaps {
                        println!("  [{:<6}] {} ({})", gap.priority.label(), gap.text, gap.checklist_title);
                    }
                }
                Ok(())
            }
        }
    }

    pub fn priority(&self, text: &str, priority: GapPriority) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => Self::print_json(&serde_json::json!({ "text": text, "priority": priority })),
            OutputFormat::Text => {
                println!("{priority}");
                Ok(())
            }
        }
    }

    pub fn checklists(&self, checklists: &[Checklist]) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => Self::print_json(&checklists),
            OutputFormat::Text => {
                for c in checklists {
                    println!("{:>3}  {}  ({} controls)", c.id, c.title, c.controls.len());
                }
                Ok(())
            }
        }
    }
}
