//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storyforge::{AspectRatio, MediaPayload, ProductionConfig, StoryParameters, VisualStyle};
use uuid::Uuid;

/// Storyforge - identity-consistent storyboards from a single reference image
#[derive(Parser, Debug)]
#[command(name = "storyforge")]
#[command(about = "Identity-consistent storyboards from a single reference image", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Extra configuration file, applied last
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe the physical features of the subject in an image
    Describe {
        /// Reference image of the subject
        #[arg(long)]
        identity: PathBuf,
    },

    /// Write a four-scene script
    Script(ScriptArgs),

    /// Produce a storyboard and store it as a session
    Produce(ProduceArgs),

    /// Regenerate one scene of a stored session
    Regenerate {
        /// Session id
        #[arg(long)]
        session: Uuid,

        /// Scene number, starting at 1
        #[arg(long)]
        scene: usize,
    },

    /// Show a stored session
    Show {
        /// Session id
        #[arg(long)]
        session: Uuid,
    },

    /// List stored sessions, newest first
    Sessions,
}

/// Story brief shared by `script` and `produce`
#[derive(Args, Debug, Default)]
pub struct StoryArgs {
    /// Story premise; omit to let the writer invent one
    #[arg(long)]
    pub idea: Option<String>,

    /// Target audience
    #[arg(long)]
    pub audience: Option<String>,

    /// Goal of the piece
    #[arg(long)]
    pub goal: Option<String>,

    /// Free-text guidance for the writer
    #[arg(long)]
    pub guidance: Option<String>,

    /// Narrative language
    #[arg(long)]
    pub language: Option<String>,

    /// Role the subject plays
    #[arg(long)]
    pub role: Option<String>,

    /// Video whose pacing and tone the writer should imitate
    #[arg(long)]
    pub style_video: Option<PathBuf>,

    /// Vertical 9:16 framing instead of 16:9
    #[arg(long)]
    pub reel: bool,

    /// Rendering style (animated-3d, photoreal, flat-illustration)
    #[arg(long)]
    pub style: Option<VisualStyle>,

    /// Environment or outfit modifiers applied to every scene
    #[arg(long)]
    pub modifiers: Option<String>,

    /// Line to weave into the end of the caption
    #[arg(long)]
    pub closing_line: Option<String>,
}

impl StoryArgs {
    /// Parameters from these arguments over the configured defaults.
    ///
    /// The style reference video is passed in already loaded.
    pub fn parameters(
        &self,
        defaults: &ProductionConfig,
        style_reference: Option<MediaPayload>,
    ) -> StoryParameters {
        let mut builder = defaults.parameters();
        if let Some(video) = style_reference {
            builder.style_reference(video);
        }
        if let Some(idea) = &self.idea {
            builder.idea(idea.clone());
        }
        if let Some(audience) = &self.audience {
            builder.audience(audience.clone());
        }
        if let Some(goal) = &self.goal {
            builder.goal(goal.clone());
        }
        if let Some(guidance) = &self.guidance {
            builder.guidance(guidance.clone());
        }
        if let Some(language) = &self.language {
            builder.language(language.clone());
        }
        if let Some(role) = &self.role {
            builder.character_role(role.clone());
        }
        if let Some(style) = self.style {
            builder.style(style);
        }
        if self.reel {
            builder.aspect_ratio(AspectRatio::Portrait);
        }
        if let Some(modifiers) = &self.modifiers {
            builder.modifiers(modifiers.clone());
        }
        if let Some(line) = &self.closing_line {
            builder.closing_line(line.clone());
        }
        builder
            .build()
            .unwrap_or_else(|_| defaults.default_parameters())
    }
}

/// Arguments of `script`
#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Story brief
    #[command(flatten)]
    pub story: StoryArgs,

    /// Save the scenes as a JSON array
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments of `produce`
#[derive(Args, Debug)]
pub struct ProduceArgs {
    /// Reference image of the subject
    #[arg(long)]
    pub identity: PathBuf,

    /// JSON array of scene texts (as written by `script --out`)
    #[arg(long, conflicts_with = "scene")]
    pub scenes: Option<PathBuf>,

    /// A scene text; repeat in order. Omit both this and --scenes to write a script first
    #[arg(long)]
    pub scene: Vec<String>,

    /// Story brief
    #[command(flatten)]
    pub story: StoryArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn story_args_override_defaults() {
        let cli = Cli::parse_from([
            "storyforge",
            "script",
            "--idea",
            "A robot learns to cook",
            "--reel",
            "--style",
            "photoreal",
            "--closing-line",
            "Follow for part two",
        ]);
        let Commands::Script(args) = cli.command else {
            panic!("expected script command");
        };
        let params = args.story.parameters(&ProductionConfig::default(), None);

        assert_eq!(params.idea(), "A robot learns to cook");
        assert_eq!(params.aspect_ratio(), &AspectRatio::Portrait);
        assert_eq!(params.style(), &VisualStyle::Photoreal);
        assert_eq!(params.effective_closing_line(), Some("Follow for part two"));
        assert_eq!(params.language(), "Spanish");
    }

    #[test]
    fn scene_list_and_file_conflict() {
        let result = Cli::try_parse_from([
            "storyforge",
            "produce",
            "--identity",
            "me.png",
            "--scenes",
            "scenes.json",
            "--scene",
            "The Protagonist waves.",
        ]);
        assert!(result.is_err());
    }
}
