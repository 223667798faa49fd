use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nbt_core::pretty::to_formatted_string;
use nbt_core::provider::{from_provider_string, to_provider_form_with};
use nbt_core::storage::{compute_tag_id, tag_id_hex};
use nbt_core::version::{get_data_version, put_data_version_with, DATA_VERSION_KEY};
use nbt_core::{binary, convert, matches, snbt, Compound, JsonOps, NbtConfig, NbtOps, Tag, TagFile};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const DEFAULT_CONFIG: &str = "nbt.toml";

#[derive(Parser)]
#[command(author, version, about = "NBT tree tooling")]
struct Cli {
    /// Settings file; `nbt.toml` in the working directory is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pretty print a tree.
    Fmt {
        file: PathBuf,
        /// Print array values instead of a placeholder.
        #[arg(long)]
        arrays: bool,
    },
    /// Print a tree as SNBT.
    Snbt {
        file: PathBuf,
        /// Use the multi-line ordered layout.
        #[arg(long)]
        ordered: bool,
    },
    /// Compile SNBT into the binary form, stamping the data version.
    Compile {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Wrap the payload in a checksummed `.nbtf` frame.
        #[arg(long)]
        framed: bool,
    },
    /// Export a tree as JSON or YAML.
    Export {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite a structure in provider text form.
    ProviderTo {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read provider text back into a binary structure.
    ProviderFrom {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Convert every `.snbt` provider file under a directory into `.nbt`.
    ConvertDir {
        dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Check whether `subject` contains everything in `standard`.
    Match {
        standard: PathBuf,
        subject: PathBuf,
        #[arg(long)]
        ignore_list_order: bool,
    },
    /// Print the content id of a tree.
    Id { file: PathBuf },
    /// Print the data version of a tree, or write the configured one.
    Stamp {
        file: PathBuf,
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Json,
    Yaml,
}

/// On-disk encodings, picked by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TreeFormat {
    Snbt,
    Binary,
    Framed,
}

impl TreeFormat {
    fn of(path: &Path) -> TreeFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("nbt") => TreeFormat::Binary,
            Some("nbtf") => TreeFormat::Framed,
            _ => TreeFormat::Snbt,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Fmt { file, arrays } => {
            let root = read_tree(&file, &config)?;
            let arrays = arrays || config.pretty.array_contents;
            println!("{}", to_formatted_string(&Tag::Compound(root), arrays));
            Ok(())
        }
        Command::Snbt { file, ordered } => {
            let tag = Tag::Compound(read_tree(&file, &config)?);
            if ordered {
                println!("{}", snbt::to_ordered_string(&tag));
            } else {
                println!("{}", snbt::write(&tag));
            }
            Ok(())
        }
        Command::Compile {
            file,
            output,
            framed,
        } => compile(&file, &output, framed, &config),
        Command::Export {
            file,
            format,
            output,
        } => export(&file, format, output.as_deref(), &config),
        Command::ProviderTo { file, output } => provider_to(&file, output.as_deref(), &config),
        Command::ProviderFrom { file, output } => {
            let root = read_provider(&file, &config)?;
            write_tree(&output, &root)
        }
        Command::ConvertDir { dir, output } => {
            let converted = convert_dir(&dir, &output, &config)?;
            info!(count = converted, "converted provider files");
            Ok(())
        }
        Command::Match {
            standard,
            subject,
            ignore_list_order,
        } => {
            let standard = Tag::Compound(read_tree(&standard, &config)?);
            let subject = Tag::Compound(read_tree(&subject, &config)?);
            if !matches(Some(&standard), Some(&subject), ignore_list_order) {
                bail!("subject does not match standard");
            }
            println!("match");
            Ok(())
        }
        Command::Id { file } => {
            let root = read_tree(&file, &config)?;
            let id = compute_tag_id(&Tag::Compound(root))?;
            println!("{}", tag_id_hex(&id));
            Ok(())
        }
        Command::Stamp { file, write } => stamp(&file, write, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<NbtConfig> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => return Ok(NbtConfig::default()),
    };
    debug!(path = %path.display(), "loading config");
    NbtConfig::load(path).with_context(|| format!("load config {}", path.display()))
}

fn read_tree(path: &Path, config: &NbtConfig) -> Result<Compound> {
    let root = match TreeFormat::of(path) {
        TreeFormat::Snbt => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            snbt::read_compound(&text).with_context(|| format!("parse {}", path.display()))?
        }
        TreeFormat::Binary => {
            let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
            binary::from_bytes(&bytes, config.limits.tracker())
                .with_context(|| format!("decode {}", path.display()))?
        }
        TreeFormat::Framed => {
            let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
            TagFile::from_binary_with(&bytes, config.limits.tracker())
                .with_context(|| format!("decode {}", path.display()))?
                .root
        }
    };
    Ok(root)
}

fn write_tree(path: &Path, root: &Compound) -> Result<()> {
    let bytes = match TreeFormat::of(path) {
        TreeFormat::Snbt => snbt::to_ordered_string(&Tag::Compound(root.clone())).into_bytes(),
        TreeFormat::Binary => binary::to_bytes(root)?,
        TreeFormat::Framed => TagFile::new(root.clone()).to_binary()?,
    };
    write_output(path, &bytes)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

fn stamp_missing(root: &mut Compound, config: &NbtConfig) {
    if !root.contains(DATA_VERSION_KEY) {
        put_data_version_with(root, config.data_version);
    }
}

fn compile(file: &Path, output: &Path, framed: bool, config: &NbtConfig) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let mut root = snbt::read_compound(&text).with_context(|| format!("parse {}", file.display()))?;
    stamp_missing(&mut root, config);
    let bytes = if framed {
        TagFile::new(root).to_binary()?
    } else {
        binary::to_bytes(&root)?
    };
    write_output(output, &bytes)
}

fn export(file: &Path, format: ExportFormat, output: Option<&Path>, config: &NbtConfig) -> Result<()> {
    let root = read_tree(file, config)?;
    let value = convert(&NbtOps, &JsonOps, &Tag::Compound(root));
    let text = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&value)?,
        ExportFormat::Yaml => serde_yaml::to_string(&value)?,
    };
    match output {
        Some(path) => write_output(path, text.as_bytes()),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn provider_to(file: &Path, output: Option<&Path>, config: &NbtConfig) -> Result<()> {
    let root = read_tree(file, config)?;
    let provider = to_provider_form_with(root, config.provider.options())
        .with_context(|| format!("provider form of {}", file.display()))?;
    let text = snbt::to_ordered_string(&Tag::Compound(provider));
    match output {
        Some(path) => write_output(path, text.as_bytes()),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn read_provider(file: &Path, config: &NbtConfig) -> Result<Compound> {
    let text = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let mut root =
        from_provider_string(&text).with_context(|| format!("provider form of {}", file.display()))?;
    stamp_missing(&mut root, config);
    Ok(root)
}

/// Mirrors the `.snbt` files under `dir` into `output` as binary `.nbt`.
/// Returns the number of files written.
fn convert_dir(dir: &Path, output: &Path, config: &NbtConfig) -> Result<usize> {
    let mut converted = 0;
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("snbt") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path);
        let target = output.join(rel).with_extension("nbt");
        match read_provider(path, config) {
            Ok(root) => {
                write_tree(&target, &root)?;
                info!(from = %path.display(), to = %target.display(), "converted");
                converted += 1;
            }
            Err(err) => warn!(path = %path.display(), "skipping: {err:#}"),
        }
    }
    Ok(converted)
}

fn stamp(file: &Path, write: bool, config: &NbtConfig) -> Result<()> {
    let mut root = read_tree(file, config)?;
    if write {
        put_data_version_with(&mut root, config.data_version);
        write_tree(file, &root)?;
    }
    println!("{}", get_data_version(&root));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_follow_extensions() {
        assert_eq!(TreeFormat::of(Path::new("a/b.nbt")), TreeFormat::Binary);
        assert_eq!(TreeFormat::of(Path::new("b.nbtf")), TreeFormat::Framed);
        assert_eq!(TreeFormat::of(Path::new("b.snbt")), TreeFormat::Snbt);
        assert_eq!(TreeFormat::of(Path::new("noext")), TreeFormat::Snbt);
    }

    #[test]
    fn trees_survive_every_format() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = NbtConfig::default();
        let root = snbt::read_compound("{name: \"x\", data: [I; 1, 2]}").expect("snbt");
        for name in ["t.snbt", "t.nbt", "t.nbtf"] {
            let path = dir.path().join(name);
            write_tree(&path, &root).expect("write");
            assert_eq!(read_tree(&path, &config).expect("read"), root, "{name}");
        }
    }

    #[test]
    fn convert_dir_mirrors_provider_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in");
        fs::create_dir_all(input.join("village")).expect("mkdir");
        fs::write(
            input.join("village/house.snbt"),
            "{palette: [\"minecraft:stone\"], data: [{pos: [0, 0, 0], state: \"minecraft:stone\"}]}",
        )
        .expect("write provider");
        fs::write(input.join("broken.snbt"), "{data: [{state: \"nope\"}]}").expect("write broken");
        fs::write(input.join("notes.txt"), "ignored").expect("write notes");

        let output = dir.path().join("out");
        let config = NbtConfig::default();
        assert_eq!(convert_dir(&input, &output, &config).expect("convert"), 1);

        let root = read_tree(&output.join("village/house.nbt"), &config).expect("read output");
        assert_eq!(get_data_version(&root), config.data_version);
        let blocks = root.get_list("blocks").expect("blocks");
        assert_eq!(blocks.get_compound(0).and_then(|b| b.get_int("state")), Some(0));
    }
}
