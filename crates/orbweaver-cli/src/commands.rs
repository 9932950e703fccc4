//! CLI command definitions and handlers

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use orbweaver_core::model::{Iri, Triple};
use orbweaver_core::node::{Node, NodeSet};
use orbweaver_core::ontology::{Ontology, SharedOntology};
use orbweaver_core::owl::{Axiom, ClassExpression, ObjectPropertyExpression};
use orbweaver_engine::{
    translator, BufferingMode, FreshEntityPolicy, Reasoner, ReasonerConfig, ReasonerFactory, TracingProgressMonitor,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(name = "orbweaver")]
#[command(about = "Materializing OWL reasoner over JSON ontology documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Reasoner configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Flush on every edit instead of on `flush`
    #[arg(long, global = true)]
    pub non_buffering: bool,

    /// Reject queries naming entities outside the ontology signature
    #[arg(long, global = true)]
    pub disallow_fresh_entities: bool,

    /// Bound on forward-chaining rounds
    #[arg(long, global = true)]
    pub max_rounds: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The configuration file, if any, with command-line overrides applied
    pub fn reasoner_config(&self) -> Result<ReasonerConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if self.non_buffering {
            config.buffering_mode = BufferingMode::NonBuffering;
        }
        if self.disallow_fresh_entities {
            config.fresh_entity_policy = FreshEntityPolicy::Disallow;
        }
        if let Some(rounds) = self.max_rounds {
            config.max_chaining_rounds = rounds;
        }
        Ok(config)
    }
}

/// Available CLI commands
///
/// Query commands take `--ontology` to load a document first; without it
/// they run against the ontology loaded earlier in the session.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load an ontology document and build a reasoner for it
    Load {
        path: PathBuf,
    },

    /// Print the materialized fact store
    Materialize {
        #[arg(short, long)]
        ontology: Option<PathBuf>,

        /// Only print facts that are not base assertions
        #[arg(long)]
        derived: bool,
    },

    /// Types of a named individual
    Types {
        individual: String,

        #[arg(long)]
        direct: bool,

        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },

    /// Instances of a named class
    Instances {
        class: String,

        #[arg(long)]
        direct: bool,

        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },

    /// Object property values of a named individual
    Values {
        individual: String,
        property: String,

        /// Follow the inverse of the property
        #[arg(long)]
        inverse: bool,

        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },

    /// Individuals known to be the same as the given one
    Same {
        individual: String,

        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },

    /// Individuals known to be different from the given one
    Different {
        individual: String,

        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },

    /// Check whether the ontology is consistent
    Consistent {
        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },

    /// Check whether an axiom (JSON) is entailed
    Entailed {
        axiom: String,

        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },

    /// Add an axiom (JSON) to the loaded ontology
    Add {
        axiom: String,
    },

    /// Remove an axiom (JSON) from the loaded ontology
    Remove {
        axiom: String,
    },

    /// Apply buffered edits to the reasoner
    Flush,

    /// Show edits not yet flushed
    Pending,

    /// Show reasoner and fact store information
    Info {
        #[arg(short, long)]
        ontology: Option<PathBuf>,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

/// Command execution result
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    /// Text rendering, one entry per line
    pub lines: Vec<String>,
    pub data: serde_json::Value,
}

impl CommandResult {
    fn ok<S: Into<String>>(message: S, lines: Vec<String>, data: serde_json::Value) -> Self {
        Self { success: true, message: message.into(), lines, data }
    }

    /// Negative answers exit non-zero
    fn answer<S: Into<String>>(answer: bool, message: S, data: serde_json::Value) -> Self {
        Self { success: answer, message: message.into(), lines: Vec::new(), data }
    }

    /// Render the result in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => {
                let mut output = self.message.clone();
                for line in &self.lines {
                    output.push_str("\n  ");
                    output.push_str(line);
                }
                output
            }
            OutputFormat::Json => serde_json::to_string(&self.data)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&self.data)?,
        })
    }
}

/// Execute CLI commands against a loaded ontology
pub struct CommandExecutor {
    factory: ReasonerFactory,
    config: ReasonerConfig,
    reasoner: Option<Reasoner>,
    source: Option<PathBuf>,
}

impl CommandExecutor {
    pub fn new(config: ReasonerConfig) -> Self {
        Self {
            factory: ReasonerFactory::new().with_progress_monitor(Arc::new(TracingProgressMonitor::new())),
            config,
            reasoner: None,
            source: None,
        }
    }

    /// Build an executor from an optional configuration file
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(load_config(path)?))
    }

    pub fn reasoner(&self) -> Option<&Reasoner> {
        self.reasoner.as_ref()
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Load { path } => self.execute_load(&path),
            Commands::Materialize { ontology, derived } => materialize(self.session(ontology.as_deref())?, derived),
            Commands::Types { individual, direct, ontology } => {
                let reasoner = self.session(ontology.as_deref())?;
                let types = reasoner.get_types(&Iri::new(individual.as_str()), direct)?;
                Ok(node_set_result(format!("Types of {}", individual), &types))
            }
            Commands::Instances { class, direct, ontology } => {
                let reasoner = self.session(ontology.as_deref())?;
                let instances = reasoner.get_instances(&ClassExpression::class(class.as_str()), direct)?;
                Ok(node_set_result(format!("Instances of {}", class), &instances))
            }
            Commands::Values { individual, property, inverse, ontology } => {
                let reasoner = self.session(ontology.as_deref())?;
                let expression = if inverse {
                    ObjectPropertyExpression::inverse_of(property.as_str())
                } else {
                    ObjectPropertyExpression::named(property.as_str())
                };
                let values = reasoner.get_object_property_values(&Iri::new(individual.as_str()), &expression)?;
                Ok(node_set_result(format!("Values of {} for {}", individual, property), &values))
            }
            Commands::Same { individual, ontology } => {
                let reasoner = self.session(ontology.as_deref())?;
                let same = reasoner.get_same_individuals(&Iri::new(individual.as_str()))?;
                Ok(node_result(format!("Same as {}", individual), &same))
            }
            Commands::Different { individual, ontology } => {
                let reasoner = self.session(ontology.as_deref())?;
                let different = reasoner.get_different_individuals(&Iri::new(individual.as_str()))?;
                Ok(node_set_result(format!("Different from {}", individual), &different))
            }
            Commands::Consistent { ontology } => {
                let consistent = self.session(ontology.as_deref())?.is_consistent();
                let message = if consistent { "Ontology is consistent" } else { "Ontology is inconsistent" };
                Ok(CommandResult::answer(consistent, message, json!({ "consistent": consistent })))
            }
            Commands::Entailed { axiom, ontology } => {
                let axiom = parse_axiom(&axiom)?;
                let entailed = self.session(ontology.as_deref())?.is_entailed(&axiom)?;
                let message = if entailed { "Entailed" } else { "Not entailed" };
                Ok(CommandResult::answer(entailed, message, json!({ "entailed": entailed })))
            }
            Commands::Add { axiom } => {
                let axiom = parse_axiom(&axiom)?;
                let added = self.session(None)?.root_ontology().add_axiom(axiom);
                let message = if added { "Axiom added" } else { "Axiom already present" };
                Ok(CommandResult::ok(message, Vec::new(), json!({ "changed": added })))
            }
            Commands::Remove { axiom } => {
                let axiom = parse_axiom(&axiom)?;
                let removed = self.session(None)?.root_ontology().remove_axiom(axiom);
                let message = if removed { "Axiom removed" } else { "Axiom not present" };
                Ok(CommandResult::ok(message, Vec::new(), json!({ "changed": removed })))
            }
            Commands::Flush => {
                let stats = self.session(None)?.flush()?;
                let message = format!(
                    "Flushed in {}ms: {} rules, {} facts",
                    stats.execution_time_ms, stats.rule_count, stats.materialized_triples
                );
                Ok(CommandResult::ok(message, Vec::new(), serde_json::to_value(&stats)?))
            }
            Commands::Pending => {
                let reasoner = self.session(None)?;
                let additions = reasoner.pending_axiom_additions();
                let removals = reasoner.pending_axiom_removals();
                let lines = additions
                    .iter()
                    .map(|axiom| format!("+ {:?}", axiom))
                    .chain(removals.iter().map(|axiom| format!("- {:?}", axiom)))
                    .collect();
                Ok(CommandResult::ok(
                    format!("{} pending changes ({:?})", reasoner.pending_changes().len(), reasoner.staleness()),
                    lines,
                    json!({ "additions": additions, "removals": removals, "staleness": reasoner.staleness() }),
                ))
            }
            Commands::Info { ontology } => self.execute_info(ontology.as_deref()),
        }
    }

    fn execute_load(&mut self, path: &Path) -> Result<CommandResult> {
        let reasoner = self.load(path)?;
        let store = reasoner.fact_store();
        let message = format!(
            "Loaded {} ({} axioms, {} facts)",
            path.display(),
            reasoner.root_ontology().read().axiom_count(),
            store.len()
        );
        Ok(CommandResult::ok(message, Vec::new(), json!({ "statistics": store.statistics() })))
    }

    fn execute_info(&mut self, ontology: Option<&Path>) -> Result<CommandResult> {
        let mut info = json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "reasoner": self.factory.reasoner_name(),
            "config": self.config,
        });
        let mut lines = vec![format!("config: {}", serde_json::to_string(&self.config)?)];

        if ontology.is_some() || self.reasoner.is_some() {
            let reasoner = self.session(ontology)?;
            let store = reasoner.fact_store();
            info["reasoner_version"] = json!(reasoner.reasoner_version());
            info["rules"] = json!(reasoner.rule_set().len());
            info["statistics"] = json!(store.statistics());
            info["last_flush"] = json!(reasoner.last_flush());
            lines.push(format!("rules: {}", reasoner.rule_set().len()));
            lines.push(format!("facts: {}", store.len()));
            lines.push(format!("staleness: {:?}", reasoner.staleness()));
        }

        Ok(CommandResult::ok(
            format!("{} {}", self.factory.reasoner_name(), env!("CARGO_PKG_VERSION")),
            lines,
            info,
        ))
    }

    /// The reasoner to run a query against, loading `ontology` first if given
    fn session(&mut self, ontology: Option<&Path>) -> Result<&Reasoner> {
        if let Some(path) = ontology {
            return self.load(path);
        }
        self.reasoner
            .as_ref()
            .ok_or_else(|| anyhow!("No ontology loaded; pass --ontology or run `load` first"))
    }

    fn load(&mut self, path: &Path) -> Result<&Reasoner> {
        let document = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let ontology = Ontology::from_json_str(&document).with_context(|| format!("parsing {}", path.display()))?;
        info!(path = %path.display(), axioms = ontology.axiom_count(), "loaded ontology");

        let reasoner = self
            .factory
            .create_configured_reasoner(SharedOntology::new(ontology), self.config.clone())?;
        self.source = Some(path.to_path_buf());
        Ok(self.reasoner.insert(reasoner))
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn materialize(reasoner: &Reasoner, derived: bool) -> Result<CommandResult> {
    let store = reasoner.fact_store();
    let base = if derived {
        translator::base_facts(&reasoner.root_ontology().read())?
    } else {
        Default::default()
    };
    let mut facts: Vec<&Triple> = store.iter().filter(|triple| !base.contains(*triple)).collect();
    facts.sort();

    let lines = facts.iter().map(|triple| triple.to_string()).collect();
    Ok(CommandResult::ok(format!("{} facts", facts.len()), lines, serde_json::to_value(&facts)?))
}

fn load_config(path: Option<&Path>) -> Result<ReasonerConfig> {
    match path {
        Some(path) => ReasonerConfig::from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(ReasonerConfig::default()),
    }
}

fn parse_axiom(json: &str) -> Result<Axiom> {
    serde_json::from_str(json).with_context(|| format!("invalid axiom: {}", json))
}

fn node_label(node: &Node<Iri>) -> String {
    node.iter().map(Iri::as_str).collect::<Vec<_>>().join(" = ")
}

fn node_result(message: String, node: &Node<Iri>) -> CommandResult {
    CommandResult::ok(message, vec![node_label(node)], json!(node.entities()))
}

fn node_set_result(message: String, nodes: &NodeSet<Iri>) -> CommandResult {
    let lines = nodes.nodes().map(node_label).collect();
    let data = nodes.nodes().map(|node| node.entities().clone()).collect::<Vec<_>>();
    CommandResult::ok(message, lines, json!(data))
}
