use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ghg_rs::load::{industry_years, load_industry_csv, load_wide_csv};
use ghg_rs::playback::{Frame, PlaybackController};
use ghg_rs::viz::{ChartOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH, LegendMode};
use ghg_rs::views::{self, StackMode};
use ghg_rs::{Dataset, FrameTiming, Presets};
use ghg_rs::{stats, storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "ghg",
    version,
    about = "Aggregate, chart & animate greenhouse-gas emissions tables"
)]
struct Cli {
    /// Wide emissions table (Country, Gas Type, Industry, one column per year).
    #[arg(long, global = true, default_value = "data/emissions.csv")]
    data: PathBuf,
    /// JSON file overriding chart presets (continents, subregions, gases, …).
    #[arg(long, global = true)]
    presets: Option<PathBuf>,
    /// Locale for number labels (en, de, fr, es, it, pt, nl).
    #[arg(long, global = true, default_value = "en")]
    locale: String,
    /// Width of charts in pixels.
    #[arg(long, global = true, default_value_t = DEFAULT_WIDTH)]
    width: u32,
    /// Height of charts in pixels.
    #[arg(long, global = true, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the years, gas types, regions and industries of the table.
    Info,
    /// Continent line chart for one gas type.
    Line(GasOut),
    /// Stacked bars per continent, summed over one or more years.
    Stacked(StackedArgs),
    /// Stacked area of one region's industries over time.
    Stream(StreamArgs),
    /// Industry x Asian subregion heatmap for one year.
    Heatmap(HeatmapArgs),
    /// One frame of the Asia top-industry bar race.
    AsiaBar(YearOut),
    /// One frame of the radial subregion race.
    Radial(YearOut),
    /// One frame of the industry bar race (long-form table).
    Race(RaceArgs),
    /// Lorenz curve and Gini coefficient of region totals.
    Lorenz(LorenzArgs),
    /// Write every frame of a race chart to a directory.
    Animate(AnimateArgs),
    /// Save the table in tidy long form.
    Export(ExportArgs),
    /// Print grouped statistics per (region, gas type).
    Stats,
}

#[derive(Args, Debug)]
struct GasOut {
    /// Gas type (default: the preset's default gas).
    #[arg(long)]
    gas: Option<String>,
    /// Output chart (.svg or .png).
    #[arg(long)]
    out: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StackBy {
    Industry,
    Gas,
}

#[derive(Args, Debug)]
struct StackedArgs {
    #[arg(long)]
    gas: Option<String>,
    /// Years to sum, separated by comma or semicolon (default: the last year).
    #[arg(long)]
    years: Option<String>,
    /// What to stack inside each bar.
    #[arg(long, value_enum, default_value_t = StackBy::Industry)]
    by: StackBy,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct StreamArgs {
    #[arg(long)]
    gas: Option<String>,
    /// Region to break down by industry.
    #[arg(long, default_value = "Asia")]
    region: String,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct HeatmapArgs {
    /// Year (default: the last year).
    #[arg(long)]
    year: Option<i32>,
    /// Use the preset industry list instead of every industry present.
    #[arg(long, default_value_t = false)]
    fixed: bool,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct YearOut {
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RaceArgs {
    /// Long-form table (Industry, Year, Emissions).
    #[arg(long, default_value = "data/industry_emissions.csv")]
    industry_data: PathBuf,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct LorenzArgs {
    /// Gas type (default: the preset's focus gas).
    #[arg(long)]
    gas: Option<String>,
    /// Year (default: the preset's Lorenz year).
    #[arg(long)]
    year: Option<i32>,
    /// Output chart; without it only the Gini coefficient is printed.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RaceChart {
    Race,
    AsiaBar,
    Radial,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ImageFormat {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct AnimateArgs {
    #[arg(long, value_enum)]
    chart: RaceChart,
    /// Directory for the frames (created if missing).
    #[arg(long)]
    out_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = ImageFormat::Svg)]
    format: ImageFormat,
    /// Long-form table, for `--chart race`.
    #[arg(long, default_value = "data/industry_emissions.csv")]
    industry_data: PathBuf,
    /// Wait for each tick in real time instead of writing frames back to back.
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_years(s: &str) -> Result<Vec<i32>> {
    s.split([',', ';'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<i32>()
                .map_err(|_| anyhow!("invalid year {x:?} in --years"))
        })
        .collect()
}

struct Ctx {
    data: PathBuf,
    presets: Presets,
    opts: ChartOptions,
}

impl Ctx {
    fn dataset(&self) -> Result<Dataset> {
        load_wide_csv(&self.data).with_context(|| format!("loading {}", self.data.display()))
    }

    fn opts_titled(&self, title: impl Into<String>) -> ChartOptions {
        self.opts.clone().titled(title)
    }
}

fn year_or_last(year: Option<i32>, ds: &Dataset) -> Result<i32> {
    year.or(ds.last_year())
        .ok_or_else(|| anyhow!("the table has no year columns"))
}

fn missing_year(year: i32) -> anyhow::Error {
    anyhow!("year {year} is not in the table")
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let ctx = Ctx {
        presets: Presets::load_or_default(cli.presets.as_ref())?,
        opts: ChartOptions {
            width: cli.width,
            height: cli.height,
            locale: cli.locale.clone(),
            title: String::new(),
            legend: LegendMode::Right,
        },
        data: cli.data,
    };
    match cli.cmd {
        Command::Info => cmd_info(&ctx),
        Command::Line(args) => cmd_line(&ctx, args),
        Command::Stacked(args) => cmd_stacked(&ctx, args),
        Command::Stream(args) => cmd_stream(&ctx, args),
        Command::Heatmap(args) => cmd_heatmap(&ctx, args),
        Command::AsiaBar(args) => cmd_asia_bar(&ctx, args),
        Command::Radial(args) => cmd_radial(&ctx, args),
        Command::Race(args) => cmd_race(&ctx, args),
        Command::Lorenz(args) => cmd_lorenz(&ctx, args),
        Command::Animate(args) => cmd_animate(&ctx, args),
        Command::Export(args) => cmd_export(&ctx, args),
        Command::Stats => cmd_stats(&ctx),
    }
}

fn wrote(path: &Path) {
    eprintln!("Wrote chart to {}", path.display());
}

fn cmd_info(ctx: &Ctx) -> Result<()> {
    let ds = ctx.dataset()?;
    println!("rows: {}", ds.records.len());
    match ds.year_range() {
        Some((a, b)) => println!("years: {a}-{b} ({} columns)", ds.years.len()),
        None => println!("years: none"),
    }
    println!("gas types: {}", ds.gas_types().join(", "));
    println!("regions: {}", ds.regions().len());
    println!("industries:");
    for i in ds.industries() {
        println!("  {i}");
    }
    Ok(())
}

fn cmd_line(ctx: &Ctx, args: GasOut) -> Result<()> {
    let ds = ctx.dataset()?;
    let gas = args.gas.unwrap_or_else(|| ctx.presets.default_gas.clone());
    let series = views::continent_series(&ds, &ctx.presets, &gas);
    viz::plot_series_lines(&series, &args.out, &ctx.opts_titled(format!("{gas} by continent")))?;
    wrote(&args.out);
    Ok(())
}

fn cmd_stacked(ctx: &Ctx, args: StackedArgs) -> Result<()> {
    let ds = ctx.dataset()?;
    let gas = args.gas.unwrap_or_else(|| ctx.presets.default_gas.clone());
    let years = match args.years.as_deref() {
        Some(s) => parse_years(s)?,
        None => vec![year_or_last(None, &ds)?],
    };
    let mode = match args.by {
        StackBy::Industry => StackMode::Industry,
        StackBy::Gas => StackMode::Gas,
    };
    let bars = views::stacked_regions(&ds, &ctx.presets, &gas, &years, mode);
    if bars.years.is_empty() {
        bail!("none of the requested years are in the table");
    }
    let title = match mode {
        StackMode::Industry => format!("{gas} by industry"),
        StackMode::Gas => "Emissions by gas type".to_string(),
    };
    viz::plot_stacked_bars(&bars, &args.out, &ctx.opts_titled(title))?;
    wrote(&args.out);
    Ok(())
}

fn cmd_stream(ctx: &Ctx, args: StreamArgs) -> Result<()> {
    let ds = ctx.dataset()?;
    let gas = args.gas.unwrap_or_else(|| ctx.presets.default_gas.clone());
    let layers = views::streamgraph(&ds, &gas, &args.region);
    viz::plot_stacked_area(
        &layers,
        &args.out,
        &ctx.opts_titled(format!("{gas} in {} by industry", args.region)),
    )?;
    wrote(&args.out);
    Ok(())
}

fn cmd_heatmap(ctx: &Ctx, args: HeatmapArgs) -> Result<()> {
    let ds = ctx.dataset()?;
    let year = year_or_last(args.year, &ds)?;
    let hm = views::subregion_heatmap(&ds, &ctx.presets, year, args.fixed)
        .ok_or_else(|| missing_year(year))?;
    viz::plot_heatmap(
        &hm,
        hm.max,
        &args.out,
        &ctx.opts_titled(format!("{} in Asia", ctx.presets.focus_gas)),
    )?;
    wrote(&args.out);
    Ok(())
}

fn cmd_asia_bar(ctx: &Ctx, args: YearOut) -> Result<()> {
    let ds = ctx.dataset()?;
    let year = year_or_last(args.year, &ds)?;
    let frame = views::asia_bar_frame(&ds, &ctx.presets, year).ok_or_else(|| missing_year(year))?;
    let max = views::subregion_max_total(&ds, &ctx.presets);
    viz::plot_horizontal_stack(&frame, max, &args.out, &ctx.opts_titled("Top industries in Asia"))?;
    wrote(&args.out);
    Ok(())
}

fn cmd_radial(ctx: &Ctx, args: YearOut) -> Result<()> {
    let ds = ctx.dataset()?;
    let year = year_or_last(args.year, &ds)?;
    let frame = views::radial_frame(&ds, &ctx.presets, year).ok_or_else(|| missing_year(year))?;
    let max = views::subregion_max_total(&ds, &ctx.presets);
    viz::plot_radial(&frame, max, &args.out, &ctx.opts_titled("Asian subregions by industry"))?;
    wrote(&args.out);
    Ok(())
}

fn cmd_race(ctx: &Ctx, args: RaceArgs) -> Result<()> {
    let records = load_industry_csv(&args.industry_data)
        .with_context(|| format!("loading {}", args.industry_data.display()))?;
    let year = match args.year {
        Some(y) => y,
        None => *industry_years(&records)
            .last()
            .ok_or_else(|| anyhow!("the industry table is empty"))?,
    };
    let bars = views::race_frame(&records, year).ok_or_else(|| missing_year(year))?;
    let opts = ChartOptions {
        legend: LegendMode::Hidden,
        ..ctx.opts_titled("Emissions by industry")
    };
    viz::plot_race_frame(&bars, year, views::race_max(&records), &args.out, &opts)?;
    wrote(&args.out);
    Ok(())
}

fn cmd_lorenz(ctx: &Ctx, args: LorenzArgs) -> Result<()> {
    let ds = ctx.dataset()?;
    let gas = args.gas.unwrap_or_else(|| ctx.presets.focus_gas.clone());
    let year = args.year.unwrap_or(ctx.presets.lorenz_year);
    let curve = views::lorenz(&ds, &gas, year).ok_or_else(|| missing_year(year))?;
    println!("gini({gas}, {year}) = {:.4} over {} regions", curve.gini, curve.ranked.len());
    if let Some(out) = args.out.as_ref() {
        let opts = ChartOptions {
            legend: LegendMode::Hidden,
            ..ctx.opts_titled(format!("Inequality of {gas} emissions, {year}"))
        };
        viz::plot_lorenz(&curve, out, &opts)?;
        wrote(out);
    }
    Ok(())
}

fn cmd_animate(ctx: &Ctx, args: AnimateArgs) -> Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let ext = match args.format {
        ImageFormat::Svg => "svg",
        ImageFormat::Png => "png",
    };

    // Everything a frame needs is loaded once, up front.
    enum Source {
        Race(Vec<ghg_rs::IndustryRecord>, f64),
        Wide(Dataset, f64),
    }
    let (source, years, interval) = match args.chart {
        RaceChart::Race => {
            let records = load_industry_csv(&args.industry_data)
                .with_context(|| format!("loading {}", args.industry_data.display()))?;
            let years = industry_years(&records);
            let max = views::race_max(&records);
            (Source::Race(records, max), years, FrameTiming::RACE)
        }
        RaceChart::AsiaBar | RaceChart::Radial => {
            let ds = ctx.dataset()?;
            let max = views::subregion_max_total(&ds, &ctx.presets);
            let years = ds.years.clone();
            let interval = match args.chart {
                RaceChart::Radial => FrameTiming::RADIAL,
                _ => FrameTiming::ASIA_BAR,
            };
            (Source::Wide(ds, max), years, interval)
        }
    };

    let render = |year: i32, path: &Path| -> Result<()> {
        match (&source, args.chart) {
            (Source::Race(records, max), _) => {
                let bars = views::race_frame(records, year).ok_or_else(|| missing_year(year))?;
                let opts = ChartOptions {
                    legend: LegendMode::Hidden,
                    ..ctx.opts_titled("Emissions by industry")
                };
                viz::plot_race_frame(&bars, year, *max, path, &opts)
            }
            (Source::Wide(ds, max), RaceChart::Radial) => {
                let frame = views::radial_frame(ds, &ctx.presets, year)
                    .ok_or_else(|| missing_year(year))?;
                viz::plot_radial(&frame, *max, path, &ctx.opts_titled("Asian subregions by industry"))
            }
            (Source::Wide(ds, max), _) => {
                let frame = views::asia_bar_frame(ds, &ctx.presets, year)
                    .ok_or_else(|| missing_year(year))?;
                viz::plot_horizontal_stack(&frame, *max, path, &ctx.opts_titled("Top industries in Asia"))
            }
        }
    };

    let mut written: Vec<PathBuf> = Vec::new();
    let mut first_error: Option<anyhow::Error> = None;
    let mut sink = |f: Frame| {
        let path = args.out_dir.join(format!("frame_{:03}_{}.{ext}", f.index, f.year));
        match render(f.year, &path) {
            Ok(()) => written.push(path),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    };

    let mut player = PlaybackController::race(years, interval);
    let mut now = Instant::now();
    player.play(now, &mut sink);
    while player.is_running() {
        if args.realtime {
            if let Some(wait) = player.time_until_next_tick(Instant::now()) {
                std::thread::sleep(wait);
            }
            now = Instant::now();
        } else {
            now += player.interval();
        }
        player.poll(now, &mut sink);
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    info!("animation finished after {} frames", written.len());
    eprintln!("Wrote {} frames to {}", written.len(), args.out_dir.display());
    Ok(())
}

fn cmd_export(ctx: &Ctx, args: ExportArgs) -> Result<()> {
    let ds = ctx.dataset()?;
    let rows = storage::to_long_form(&ds);
    let path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&rows, path)?,
        "json" => storage::save_json(&rows, path)?,
        other => bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn cmd_stats(ctx: &Ctx) -> Result<()> {
    let ds = ctx.dataset()?;
    for s in stats::grouped_summary(&ds) {
        println!(
            "{} | {}  count={} missing={}  min={} max={} mean={} median={}",
            s.key.region,
            s.key.gas_type,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}
