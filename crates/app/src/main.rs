use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rturox_site_core::canvas::Animation;
use rturox_site_core::slider::Measurements;
use rturox_site_core::{
    skeleton, ColdCache, Constellation, DrawList, FrameLoop, Page, PointerContext, Section,
    SiteConfig, SiteContent, Slider, SpringWeb, StaticLayout, Viewport,
};
use tracing_subscriber::EnvFilter;

fn main() -> rturox_site_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { width, content } => run_render(config, width, content.as_deref()),
        Commands::JsonLd { content } => run_json_ld(content.as_deref()),
        Commands::Simulate {
            frames,
            width,
            height,
            pointer,
            seed,
        } => run_simulate(&config, frames, width, height, pointer, seed),
        Commands::Slider {
            items,
            wrapper_width,
            item_width,
            gap,
            clicks,
        } => run_slider(&config, items, wrapper_width, item_width, gap, clicks),
    }
}

fn load_config(path: Option<&Path>) -> rturox_site_core::Result<SiteConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            SiteConfig::load(path)
        }
        None => Ok(SiteConfig::default()),
    }
}

fn load_content(path: Option<&Path>) -> rturox_site_core::Result<SiteContent> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading site content");
            SiteContent::from_json_str(&std::fs::read_to_string(path)?)
        }
        None => Ok(SiteContent::default()),
    }
}

fn run_render(config: SiteConfig, width: f32, content: Option<&Path>) -> rturox_site_core::Result<()> {
    let content = load_content(content)?;
    let doc = skeleton(&content);
    let page = Page::load(
        doc,
        StaticLayout::new(),
        config,
        content,
        Viewport::new(width, 900.0),
        &ColdCache,
        0,
    );
    let tier = page.rebuilder().tier().map(|tier| tier.as_str()).unwrap_or("unknown");
    tracing::info!(width, tier, "rendered sections");

    for section in Section::ALL {
        if let Some(root) = page.rebuilder().rendered_root(section) {
            println!("{}", page.document().to_html(root));
        }
    }
    Ok(())
}

fn run_json_ld(content: Option<&Path>) -> rturox_site_core::Result<()> {
    let content = load_content(content)?;
    println!("{}", content.organization.to_json_ld()?);
    Ok(())
}

fn run_simulate(
    config: &SiteConfig,
    frames: u64,
    width: f32,
    height: f32,
    pointer: Option<(f32, f32)>,
    seed: u64,
) -> rturox_site_core::Result<()> {
    tracing::info!(frames, width, height, seed, "running canvas simulation");

    let context = PointerContext::new();
    if let Some((x, y)) = pointer {
        context.set(x, y);
    }
    let animations: Vec<Box<dyn Animation>> = vec![
        Box::new(Constellation::new(config.constellation, context.clone(), seed)),
        Box::new(SpringWeb::new(config.web, context.clone())),
    ];

    let mut report = Vec::new();
    for animation in animations {
        let name = animation.name();
        let mut frame_loop = FrameLoop::new(width, height);
        frame_loop.spawn(animation);

        let mut surface = DrawList::new();
        let (mut circles, mut lines) = (0usize, 0usize);
        for _ in 0..frames {
            surface.clear_commands();
            frame_loop.tick(&mut surface);
            circles += surface.circles();
            lines += surface.lines();
        }
        report.push(serde_json::json!({
            "animation": name,
            "frames": frames,
            "circles": circles,
            "lines": lines,
        }));
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_slider(
    config: &SiteConfig,
    items: usize,
    wrapper_width: f32,
    item_width: f32,
    gap: f32,
    clicks: usize,
) -> rturox_site_core::Result<()> {
    let mut slider = Slider::new(
        config.slider,
        items,
        Measurements {
            wrapper_width,
            item_width: Some(item_width),
            gap: Some(gap),
        },
    );
    tracing::info!(
        visible = slider.visible_count(),
        step = slider.step(),
        max_index = slider.max_index(),
        "slider measured"
    );

    let indices: Vec<usize> = (0..clicks)
        .map(|_| {
            slider.next();
            slider.index()
        })
        .collect();
    println!("{}", serde_json::to_string(&indices)?);
    Ok(())
}

fn parse_point(raw: &str) -> Result<(f32, f32), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{raw}`"))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid coordinate `{value}`: {err}"))
    };
    Ok((parse(x)?, parse(y)?))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the Rturox-Tech site behaviour headless", long_about = None)]
struct Cli {
    /// JSON configuration file; missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the responsive sections for a viewport width and print them.
    Render {
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        /// Site content JSON replacing the built-in lists.
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Print the organization's JSON-LD block.
    JsonLd {
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Run the canvas animations without a display and report draw counts.
    Simulate {
        #[arg(long, default_value_t = 120)]
        frames: u64,
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        #[arg(long, default_value_t = 720.0)]
        height: f32,
        /// Fixed pointer position as `X,Y`.
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f32, f32)>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Click "next" repeatedly and print the resulting indices.
    Slider {
        #[arg(long)]
        items: usize,
        #[arg(long)]
        wrapper_width: f32,
        #[arg(long, default_value_t = 220.0)]
        item_width: f32,
        #[arg(long, default_value_t = 16.0)]
        gap: f32,
        #[arg(long, default_value_t = 3)]
        clicks: usize,
    },
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
    fn parses_pointer_coordinates() {
        assert_eq!(parse_point("10, 20.5"), Ok((10.0, 20.5)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn global_config_flag_follows_subcommand() {
        let cli = Cli::try_parse_from(["app", "json-ld", "--config", "site.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site.json")));
    }
}
