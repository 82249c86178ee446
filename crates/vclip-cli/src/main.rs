//! Direct clip generation, outside the broker: runs the same pipeline the
//! worker runs against a single job, for reproducing a failing job locally
//! without standing up Redis.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_asr::WhisperCliTranscriber;
use vclip_ml_client::{HttpSentimentClient, HttpTranslationClient};
use vclip_models::{ClipLengthBounds, Job, JobId, LayoutMode, ProgressSnapshot, TemplateCatalog, Timeframe};
use vclip_worker::{Pipeline, ProgressReporter, WorkerConfig};

struct StderrReporter;

#[async_trait]
impl ProgressReporter for StderrReporter {
    async fn report(&self, job_id: &JobId, snapshot: ProgressSnapshot) {
        info!(job_id = %job_id, percent = snapshot.percentage, stage = %snapshot.stage, "{}", snapshot.message);
    }
}

struct Args {
    video_url: String,
    layout: LayoutMode,
    template: String,
    max_clips: u32,
    min_length: f64,
    max_length: f64,
    target_length: f64,
    timeframe_start: Option<f64>,
    timeframe_end: Option<f64>,
    video_language: Option<String>,
    translate_captions: bool,
    caption_language: Option<String>,
    job_id: String,
}

fn print_usage() {
    eprintln!(
        "usage: vclip-cli --video-url <url> [--layout fit|fill|square|auto] [--template <name>]\n\
         \x20                 [--max-clips <n>] [--min-score <f>] [--min-length <secs>]\n\
         \x20                 [--max-length <secs>] [--target-length <secs>]\n\
         \x20                 [--timeframe-start <secs>] [--timeframe-end <secs>]\n\
         \x20                 [--video-language <code>] [--translate-captions]\n\
         \x20                 [--caption-language <code>] [--job-id <id>]"
    );
}

fn parse_args() -> anyhow::Result<Args> {
    let mut video_url = None;
    let mut layout = LayoutMode::default();
    let mut template = "default".to_string();
    let mut max_clips = 10u32;
    let mut min_length = ClipLengthBounds::default().min;
    let mut max_length = ClipLengthBounds::default().max;
    let mut target_length = ClipLengthBounds::default().target;
    let mut timeframe_start = None;
    let mut timeframe_end = None;
    let mut video_language = None;
    let mut translate_captions = false;
    let mut caption_language = None;
    let mut job_id = None;

    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        macro_rules! value {
            () => {
                raw.next().ok_or_else(|| anyhow::anyhow!("{} requires a value", arg))?
            };
        }
        match arg.as_str() {
            "--video-url" => video_url = Some(value!()),
            "--layout" => layout = value!().parse().map_err(|e| anyhow::anyhow!("{}", e))?,
            "--template" => template = value!(),
            "--max-clips" => max_clips = value!().parse()?,
            "--min-score" => {
                // Accepted for the documented surface; selection ranks by score
                // internally and has no floor to apply it against yet.
                let _: f64 = value!().parse()?;
            }
            "--min-length" => min_length = value!().parse()?,
            "--max-length" => max_length = value!().parse()?,
            "--target-length" => target_length = value!().parse()?,
            "--timeframe-start" => timeframe_start = Some(value!().parse()?),
            "--timeframe-end" => timeframe_end = Some(value!().parse()?),
            "--video-language" => video_language = Some(value!()),
            "--translate-captions" => translate_captions = true,
            "--caption-language" => caption_language = Some(value!()),
            "--job-id" => job_id = Some(value!()),
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other => anyhow::bail!("unrecognized argument: {other}"),
        }
    }

    let video_url = video_url.ok_or_else(|| anyhow::anyhow!("--video-url is required"))?;
    let job_id = job_id.unwrap_or_else(|| format!("cli-{}", std::process::id()));

    Ok(Args {
        video_url,
        layout,
        template,
        max_clips,
        min_length,
        max_length,
        target_length,
        timeframe_start,
        timeframe_end,
        video_language,
        translate_captions,
        caption_language,
        job_id,
    })
}

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("vclip=info".parse().unwrap()))
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("vclip-cli: {err}");
            print_usage();
            std::process::exit(2);
        }
    };

    match run(args).await {
        Ok(clips) => {
            println!("{}", serde_json::to_string_pretty(&clips).expect("clip records always serialize"));
            std::process::exit(0);
        }
        Err(err) => {
            warn!("pipeline failed: {}", err);
            eprintln!("vclip-cli: {err}");
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<Vec<vclip_models::ClipRecord>> {
    let config = WorkerConfig::from_env();
    let output_dir = format!("{}/{}", config.work_dir.trim_end_matches('/'), args.job_id);

    let mut job = Job::new(args.job_id, args.video_url, output_dir)
        .with_template(args.template)
        .with_layout(args.layout)
        .with_clip_length(ClipLengthBounds { min: args.min_length, target: args.target_length, max: args.max_length });
    job.max_clips = args.max_clips;
    job.timeframe = Timeframe { start: args.timeframe_start, end: args.timeframe_end };
    job.video_language = args.video_language;
    job.caption_language = args.caption_language;
    job.translate_captions = args.translate_captions;

    let transcriber_binary = std::env::var("WHISPER_BINARY").unwrap_or_else(|_| "whisper".to_string());
    let pipeline = Pipeline {
        config,
        catalog: Arc::new(TemplateCatalog::load_default()),
        transcriber: Arc::new(WhisperCliTranscriber::new(transcriber_binary)),
        sentiment: HttpSentimentClient::from_env().map(|c| Arc::new(c) as Arc<_>),
        translation: HttpTranslationClient::from_env().map(|c| Arc::new(c) as Arc<_>),
    };

    let clips = pipeline.run(&job, &StderrReporter).await?;
    info!(clip_count = clips.len(), "done");
    Ok(clips)
}
