// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, bail};
use character_property_map::{Attribute, SourceSpec, generate};

const HELP: &str = indoc::indoc! {"
    Usage: character-property-map [options...] <EastAsianWidth.txt> <emoji-data.txt> <GraphemeBreakProperty.txt> <character_property_map.txt>
      -h, --help                     Prints help information
      --east-asian-width-default=V   Value for codepoints missing from EastAsianWidth.txt (default: N)
      --emoji-default=V              Value for codepoints missing from emoji-data.txt (default: N)
      --grapheme-default=V           Value for codepoints missing from GraphemeBreakProperty.txt (default: Other)

    Download the inputs at:
      https://www.unicode.org/Public/UCD/latest/ucd/EastAsianWidth.txt
      https://www.unicode.org/Public/UCD/latest/ucd/emoji/emoji-data.txt
      https://www.unicode.org/Public/UCD/latest/ucd/auxiliary/GraphemeBreakProperty.txt
"};

enum Command {
    Help,
    /// Fewer than four paths were given.
    Usage,
    Run { sources: [SourceSpec; 3], output: PathBuf },
}

fn parse_args(mut args: pico_args::Arguments) -> anyhow::Result<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    let mut east_asian_width = Attribute::east_asian_width();
    let mut emoji = Attribute::emoji();
    let mut grapheme = Attribute::grapheme_cluster_break();
    if let Some(v) = args.opt_value_from_str("--east-asian-width-default")? {
        east_asian_width.default = v;
    }
    if let Some(v) = args.opt_value_from_str("--emoji-default")? {
        emoji.default = v;
    }
    if let Some(v) = args.opt_value_from_str("--grapheme-default")? {
        grapheme.default = v;
    }

    // Every known option has been consumed, so whatever is left is either a path
    // or a mistyped option.
    let free = args.finish();
    let unrecognized: Vec<_> = free
        .iter()
        .enumerate()
        .filter(|&(i, arg)| i >= 4 || arg.to_string_lossy().starts_with('-'))
        .map(|(_, arg)| arg)
        .collect();
    if !unrecognized.is_empty() {
        bail!("unrecognized arguments: {:?}", unrecognized);
    }

    let Ok([east_asian_width_path, emoji_path, grapheme_path, output]) =
        <[OsString; 4]>::try_from(free)
    else {
        return Ok(Command::Usage);
    };

    Ok(Command::Run {
        sources: [
            SourceSpec::new(east_asian_width_path, east_asian_width),
            SourceSpec::new(emoji_path, emoji),
            SourceSpec::new(grapheme_path, grapheme),
        ],
        output: output.into(),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (sources, output) = match parse_args(pico_args::Arguments::from_env())? {
        // Missing inputs are a usage error, not a failure.
        Command::Help | Command::Usage => {
            eprint!("{HELP}");
            return Ok(());
        }
        Command::Run { sources, output } => (sources, output),
    };

    let summary = generate(&sources, &output)
        .with_context(|| format!("failed to generate {}", output.display()))?;

    log::info!(
        "wrote {} records to {} ({:.1} codepoints per record)",
        summary.records,
        output.display(),
        summary.compression_ratio,
    );
    Ok(())
}
