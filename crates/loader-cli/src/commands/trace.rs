//! Replay gesture scripts against a scroll view
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! drag          # finger down
//! offset -80    # move content to an absolute offset
//! by -10        # move content relative to where it is
//! release       # finger up
//! start         # programmatic start_refreshing
//! end           # end_refreshing
//! wait 300      # run frames for 300ms
//! ```

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tokio::time::Instant;
use tracing::info;

use loader_core::{AppConfig, RecordingAnimator, RefreshController, ScrollView, State};

const FRAME: Duration = Duration::from_millis(16);
const VIEWPORT_HEIGHT: f64 = 500.0;
const CONTENT_HEIGHT: f64 = 2000.0;

/// One scripted gesture or timing step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Drag,
    Offset(f64),
    By(f64),
    Release,
    Start,
    End,
    Wait(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// 1-based line number in the script
    pub number: usize,
    pub step: Step,
}

/// A state the animator was asked to render
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub at_ms: u64,
    /// Script line that was running; 0 for attach
    pub line: usize,
    pub offset_y: f64,
    #[serde(flatten)]
    pub state: State,
}

pub async fn run(config: Arc<AppConfig>, file: Option<&Path>, json: bool) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read script from stdin")?;
            text
        }
    };

    let script = parse_script(&text)?;
    info!(steps = script.len(), "Replaying script");

    let events = tokio::task::spawn_blocking(move || replay_paused(&script, &config))
        .await
        .context("Replay task failed")??;

    for event in events {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!(
                "{:>6}ms  line {:>3}  offset {:>8.1}  {}",
                event.at_ms, event.line, event.offset_y, event.state
            );
        }
    }
    Ok(())
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut script = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let step = parse_line(raw).with_context(|| format!("line {}", number))?;
        if let Some(step) = step {
            script.push(ScriptLine { number, step });
        }
    }
    Ok(script)
}

fn parse_line(raw: &str) -> Result<Option<Step>> {
    let line = raw.split('#').next().unwrap_or("").trim();
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();
    if let Some(extra) = words.next() {
        bail!("unexpected argument '{}'", extra);
    }

    let number = |name: &str| -> Result<f64> {
        let value = argument.ok_or_else(|| anyhow!("'{}' needs a number", name))?;
        let parsed: f64 = value
            .parse()
            .map_err(|_| anyhow!("'{}' is not a number", value))?;
        if !parsed.is_finite() {
            bail!("'{}' is not a finite number", value);
        }
        Ok(parsed)
    };
    let bare = |step: Step| -> Result<Step> {
        match argument {
            Some(value) => bail!("'{}' takes no argument, got '{}'", command, value),
            None => Ok(step),
        }
    };

    let step = match command {
        "drag" => bare(Step::Drag)?,
        "release" => bare(Step::Release)?,
        "start" => bare(Step::Start)?,
        "end" => bare(Step::End)?,
        "offset" => Step::Offset(number("offset")?),
        "by" => Step::By(number("by")?),
        "wait" => {
            let value = argument.ok_or_else(|| anyhow!("'wait' needs milliseconds"))?;
            let millis: u64 = value
                .parse()
                .map_err(|_| anyhow!("'{}' is not a whole number of milliseconds", value))?;
            Step::Wait(Duration::from_millis(millis))
        }
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(step))
}

/// Replay on its own runtime with the clock paused
///
/// `wait` steps advance virtual time only, so timings are exact and repeatable.
pub fn replay_paused(script: &[ScriptLine], config: &AppConfig) -> Result<Vec<TraceEvent>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .context("Failed to build replay runtime")?;
    Ok(runtime.block_on(replay(script, config)))
}

/// Run the script frame by frame and collect every rendered state
pub async fn replay(script: &[ScriptLine], config: &AppConfig) -> Vec<TraceEvent> {
    let started = Instant::now();
    let mut view = ScrollView::new(VIEWPORT_HEIGHT, CONTENT_HEIGHT)
        .with_bounce_speed(config.scroll.bounce_speed);
    view.add_pull_to_refresh(
        RefreshController::new(RecordingAnimator::new(), config.refresh.clone()),
        || info!("Refresh action ran"),
    );

    let mut events = Vec::new();
    collect(&mut view, 0, started, &mut events);

    for line in script {
        match line.step {
            Step::Drag => view.begin_drag(),
            Step::Offset(y) => view.set_content_offset_y(y),
            Step::By(dy) => view.set_content_offset_y(view.content_offset_y() + dy),
            Step::Release => view.end_drag(),
            Step::Start => view.start_refreshing(),
            Step::End => view.end_refreshing(),
            Step::Wait(duration) => {
                let deadline = Instant::now() + duration;
                loop {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    tokio::time::sleep(FRAME.min(deadline - now)).await;
                    view.tick();
                    collect(&mut view, line.number, started, &mut events);
                }
            }
        }
        collect(&mut view, line.number, started, &mut events);
    }

    events
}

fn collect(
    view: &mut ScrollView<RecordingAnimator>,
    line: usize,
    started: Instant,
    events: &mut Vec<TraceEvent>,
) {
    let offset_y = view.content_offset_y();
    let Some(controller) = view.refresh_controller_mut() else {
        return;
    };
    let at_ms = started.elapsed().as_millis() as u64;
    events.extend(
        controller
            .animator_mut()
            .drain()
            .into_iter()
            .map(|state| TraceEvent {
                at_ms,
                line,
                offset_y,
                state,
            }),
    );
}
