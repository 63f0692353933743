use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout plan, session and diet tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workout session from the active plan
    Start {
        /// Day name to use instead of today's weekday match
        #[arg(long)]
        day: Option<String>,
    },

    /// Resume the session in progress
    Resume,

    /// List logged sessions, most recent first
    Sessions {
        /// Maximum number of sessions to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete a logged session by its number in `sessions`
    Delete { number: usize },

    /// Show last/best history for an exercise
    History { exercise: String },

    /// Show personal records across all sessions
    Pr,

    /// List every exercise name seen in plans and sessions
    Exercises,

    /// Show a per-session series for an exercise
    Chart {
        exercise: String,

        /// Series mode: best, avg or volume
        #[arg(long, default_value = "best")]
        mode: String,
    },

    /// Export the full state document as pretty JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the full state document from an exported file
    Import { file: PathBuf },

    /// Manage workout plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Manage diets
    Diet {
        #[command(subcommand)]
        command: DietCommands,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// List plans
    List,

    /// Create an empty plan and make it active
    Create { name: String },

    /// Install the 4-day starter plan
    Starter,

    /// Make a plan active by its number in `plan list`
    Use { number: usize },

    /// Rename a plan by its number
    Rename { number: usize, name: String },

    /// Duplicate a plan by its number
    Duplicate { number: usize },

    /// Delete a plan by its number
    Delete { number: usize },

    /// Show the active plan's days and exercises
    Show,

    /// Add a day to the active plan
    AddDay {
        name: String,

        /// Calendar weekday: 0=Sunday .. 6=Saturday
        #[arg(long)]
        weekday: Option<u8>,
    },

    /// Duplicate a day of the active plan by name
    DuplicateDay { day: String },

    /// Delete a day of the active plan by name
    DeleteDay { day: String },

    /// Reorder the active plan's days (1-based positions)
    MoveDay { from: usize, to: usize },

    /// Add an exercise to a day of the active plan
    AddExercise {
        day: String,
        name: String,

        #[arg(long, default_value_t = 3)]
        sets: u32,

        #[arg(long, default_value_t = 8)]
        rep_min: u32,

        #[arg(long, default_value_t = 12)]
        rep_max: u32,

        /// Rest prescription, plain seconds or mm:ss
        #[arg(long, default_value = "90")]
        rest: String,
    },

    /// Remove an exercise from a day by its number in `plan show`
    RemoveExercise { day: String, number: usize },

    /// Reorder a day's exercises (1-based positions)
    MoveExercise {
        day: String,
        from: usize,
        to: usize,
    },
}

#[derive(Subcommand)]
enum DietCommands {
    /// List diets
    List,

    /// Create an empty diet and make it active
    Create { name: String },

    /// Make a diet active by its number in `diet list`
    Use { number: usize },

    /// Rename a diet by its number
    Rename { number: usize, name: String },

    /// Duplicate a diet by its number
    Duplicate { number: usize },

    /// Delete a diet by its number
    Delete { number: usize },

    /// Show the active diet's week grid
    Show,

    /// Add a food line to a meal slot of the active diet (1-based day/meal)
    AddFood {
        day: usize,
        meal: usize,
        food: String,
        qty: f64,
        unit: String,
    },

    /// Remove a food line from a meal slot (1-based indices)
    RemoveFood {
        day: usize,
        meal: usize,
        number: usize,
    },

    /// Copy one day's meals over every day of the week
    CopyDay { day: usize },

    /// Copy one meal slot to the same slot of every day
    CopyMeal { day: usize, meal: usize },

    /// Print the weekly grocery list for the active diet
    Grocery,
}

fn main() -> Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let state_path = data_dir.join("state.json");

    match cli.command {
        Commands::Start { day } => cmd_start(&state_path, day),
        Commands::Resume => cmd_resume(&state_path),
        Commands::Sessions { limit } => {
            cmd_sessions(&state_path, limit.unwrap_or(config.display.history_limit))
        }
        Commands::Delete { number } => cmd_delete(&state_path, number),
        Commands::History { exercise } => cmd_history(&state_path, &exercise),
        Commands::Pr => cmd_pr(&state_path, config.display.record_limit),
        Commands::Exercises => cmd_exercises(&state_path),
        Commands::Chart { exercise, mode } => {
            cmd_chart(&state_path, &exercise, &mode, config.display.chart_ticks)
        }
        Commands::Export { out } => cmd_export(&state_path, out),
        Commands::Import { file } => cmd_import(&state_path, &file),
        Commands::Plan { command } => cmd_plan(&state_path, command),
        Commands::Diet { command } => cmd_diet(&state_path, command),
    }
}

/// Save, logging instead of failing; a full disk should not lose the
/// in-terminal session.
fn persist(state: &AppState, path: &std::path::Path) {
    if let Err(e) = state.save(path) {
        tracing::warn!("Failed to save state to {:?}: {}", path, e);
        eprintln!("Warning: could not save progress ({})", e);
    }
}

fn cmd_start(state_path: &std::path::Path, day: Option<String>) -> Result<()> {
    let mut state = AppState::load(state_path)?;
    let mut timer = RestTimer::new();

    if state.active_session_id.is_some() {
        println!("A session is already in progress. Use `liftlog resume`.");
        return Ok(());
    }

    let plan_id = state
        .active_plan_id
        .ok_or_else(|| Error::State("No active plan. Create one with `liftlog plan create` or `liftlog plan starter`.".into()))?;
    let plan = state
        .plan(plan_id)
        .ok_or_else(|| Error::NotFound("Active plan not found".into()))?;

    let day_id = match day {
        Some(name) => plan
            .days
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
            .map(|d| d.id)
            .ok_or_else(|| Error::NotFound(format!("No day named '{}' in plan", name)))?,
        None => plan::resolve_today(plan)
            .map(|d| d.id)
            .ok_or_else(|| Error::State("Active plan has no days".into()))?,
    };

    let session_id = session::start_session(&mut state, &mut timer, day_id)?;
    tracing::info!("Started session {}", session_id);
    persist(&state, state_path);

    run_session_loop(&mut state, &mut timer, state_path)
}

fn cmd_resume(state_path: &std::path::Path) -> Result<()> {
    let mut state = AppState::load(state_path)?;
    let mut timer = RestTimer::new();

    let id = state
        .active_session_id
        .ok_or_else(|| Error::State("No session in progress".into()))?;
    session::resume_session(&mut state, id)?;
    persist(&state, state_path);

    run_session_loop(&mut state, &mut timer, state_path)
}

fn run_session_loop(
    state: &mut AppState,
    timer: &mut RestTimer,
    state_path: &std::path::Path,
) -> Result<()> {
    loop {
        // Pre-fill the load for a fresh set from history so the user
        // only has to type the reps.
        if let Some(filled) = session::autofill_kg(state) {
            persist(state, state_path);
            println!("  Suggested load filled in: {} kg", filled);
        }

        let Some(session) = session::active_session(state) else {
            break;
        };

        println!();
        println!("═══ {} — {} ═══", session.plan_name, session.day_name);

        let progress = session::session_progress(session);
        println!(
            "Progress: {}/{} sets ({}%)",
            progress.done,
            progress.total,
            progress.percent()
        );

        let Some(item) = session::current_item(state) else {
            break;
        };
        let exercise = item.exercise.clone();
        let set_idx = state.active_set;
        let total_sets = item.sets.len();
        println!();
        println!(
            "▸ {}  ({} x {}-{}, rest {})",
            exercise, item.target.sets, item.target.rep_min, item.target.rep_max, item.target.rest
        );
        println!("  Set {} of {}", set_idx + 1, total_sets);

        // Last/best from earlier sessions plus a load suggestion
        let active_id = state.active_session_id;
        let hist = lookup_last_best(&state.sessions, active_id, &exercise);
        println!("  {}", history::format_history_line(&hist));
        if let Some(s) = suggest_next(hist.last.as_ref(), &item.target) {
            println!("  {}", s.message);
        }

        match prompt_set_action()? {
            SetAction::Log { kg, reps } => {
                session::record_set(state, &kg, &reps)?;
                match session::save_set(state, timer) {
                    Ok(rest) => {
                        persist(state, state_path);
                        if rest > 0 {
                            run_rest_timer(timer);
                        }
                        println!("  Set logged. 's' to move to the next set.");
                    }
                    Err(e) => println!("  {}", e),
                }
            }
            SetAction::NextSet => match session::advance_set(state)? {
                session::SetStep::Advanced(_) => persist(state, state_path),
                session::SetStep::NoMoreSets => {
                    println!("  Last set done. 'n' for next exercise.")
                }
            },
            SetAction::NextExercise => match session::advance_exercise(state, timer)? {
                session::ExerciseStep::Moved { .. } => persist(state, state_path),
                session::ExerciseStep::AtBoundary => {
                    println!("  Already at the last exercise.")
                }
            },
            SetAction::PrevExercise => match session::retreat_exercise(state, timer)? {
                session::ExerciseStep::Moved { .. } => persist(state, state_path),
                session::ExerciseStep::AtBoundary => {
                    println!("  Already at the first exercise.")
                }
            },
            SetAction::ToggleClosed => {
                let closed = session::toggle_closed(state)?;
                persist(state, state_path);
                println!(
                    "  Session marked {}.",
                    if closed { "closed" } else { "open" }
                );
            }
            SetAction::Quit => {
                session::exit_session(state, timer);
                persist(state, state_path);
                println!("Session saved. Resume any time with `liftlog resume`.");
                break;
            }
        }
    }

    Ok(())
}

enum SetAction {
    Log { kg: String, reps: String },
    NextSet,
    NextExercise,
    PrevExercise,
    ToggleClosed,
    Quit,
}

fn prompt_set_action() -> Result<SetAction> {
    println!("─────────────────────────────────────────");
    println!("Enter 'kg x reps' to log the set (e.g. 82,5 x 8)");
    println!("  's' next set   'n' next exercise   'p' previous");
    println!("  'c' toggle closed   'q' save and quit");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    let bytes = io::stdin().read_line(&mut input)?;
    if bytes == 0 {
        // stdin closed; save and leave
        return Ok(SetAction::Quit);
    }
    let input = input.trim();

    let action = match input.to_lowercase().as_str() {
        "s" => SetAction::NextSet,
        "n" => SetAction::NextExercise,
        "p" => SetAction::PrevExercise,
        "c" => SetAction::ToggleClosed,
        "q" => SetAction::Quit,
        _ => {
            let (kg, reps) = match input.split_once(['x', 'X']) {
                Some((kg, reps)) => (kg.trim().to_string(), reps.trim().to_string()),
                None => (input.to_string(), String::new()),
            };
            SetAction::Log { kg, reps }
        }
    };

    Ok(action)
}

/// Count the rest timer down in place, one tick per second.
fn run_rest_timer(timer: &mut RestTimer) {
    use liftlog_core::timer::TimerTick;

    print!("  Rest {}", timer.display());
    let _ = io::stdout().flush();

    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
        match timer.tick() {
            TimerTick::Running(_) => {
                print!("\r  Rest {}", timer.display());
                let _ = io::stdout().flush();
            }
            TimerTick::Finished => {
                println!("\r  Rest done.        ");
                break;
            }
            TimerTick::Idle => break,
        }
    }
}

fn cmd_sessions(state_path: &std::path::Path, limit: usize) -> Result<()> {
    let state = AppState::load(state_path)?;
    let recent = history::sessions_by_recency(&state.sessions);

    if recent.is_empty() {
        println!("No sessions logged yet.");
        return Ok(());
    }

    for (i, session) in recent.iter().take(limit).enumerate() {
        let sets: usize = session
            .items
            .iter()
            .flat_map(|it| &it.sets)
            .filter(|s| parse_load(&s.kg).is_some())
            .count();
        println!(
            "{:>3}. {}  {} — {}  [{} sets{}]",
            i + 1,
            parse::short_date(&session.date),
            session.plan_name,
            session.day_name,
            sets,
            if session.closed { ", closed" } else { "" }
        );
    }
    Ok(())
}

fn cmd_delete(state_path: &std::path::Path, number: usize) -> Result<()> {
    let mut state = AppState::load(state_path)?;
    let recent = history::sessions_by_recency(&state.sessions);

    let session = recent
        .get(number.wrapping_sub(1))
        .ok_or_else(|| Error::NotFound(format!("No session number {}", number)))?;
    let id = session.id;
    let label = format!("{} {}", session.date, session.day_name);
    drop(recent);

    let mut timer = RestTimer::new();
    session::delete_session(&mut state, &mut timer, id)?;
    state.save(state_path)?;
    println!("✓ Deleted session {}", label);
    Ok(())
}

fn cmd_history(state_path: &std::path::Path, exercise: &str) -> Result<()> {
    let state = AppState::load(state_path)?;
    let hist = lookup_last_best(&state.sessions, None, exercise);
    println!("{}", history::format_history_line(&hist));
    Ok(())
}

fn cmd_pr(state_path: &std::path::Path, limit: usize) -> Result<()> {
    let state = AppState::load(state_path)?;
    let records = history::personal_records(&state.sessions);

    if records.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    for record in records.iter().take(limit) {
        println!("  {}  {}kg", record.exercise, fmt_num(record.kg));
    }
    Ok(())
}

fn cmd_exercises(state_path: &std::path::Path) -> Result<()> {
    let state = AppState::load(state_path)?;
    let names = history::exercise_names(&state);

    if names.is_empty() {
        println!("No exercises yet.");
        return Ok(());
    }
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

fn cmd_chart(
    state_path: &std::path::Path,
    exercise: &str,
    mode: &str,
    tick_count: usize,
) -> Result<()> {
    let mut state = AppState::load(state_path)?;
    let mode: SeriesMode = mode.parse()?;

    // Remember the selection, like every other piece of UI state
    state.chart = ChartPrefs {
        exercise: exercise.to_string(),
        mode,
    };
    persist(&state, state_path);

    let rows = build_series(&state.sessions, exercise);
    if rows.is_empty() {
        println!("No data for this exercise yet.");
        return Ok(());
    }

    for row in &rows {
        println!("  {}", series::tooltip_label(row, mode));
    }

    let values: Vec<f64> = rows.iter().map(|r| r.value(mode)).collect();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let ticks = nice_ticks(min, max, tick_count);
    let labels: Vec<String> = ticks.iter().map(|t| series::fmt_value(mode, *t)).collect();
    println!("  Scale: {}", labels.join(" | "));

    println!("{}", series::summary_line(&rows, mode));
    Ok(())
}

fn cmd_export(state_path: &std::path::Path, out: Option<PathBuf>) -> Result<()> {
    let state = AppState::load(state_path)?;
    let json = state.export_json()?;

    match out {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("✓ Exported state to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_import(state_path: &std::path::Path, file: &std::path::Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let state = AppState::import_json(&contents)?;
    state.save(state_path)?;
    println!(
        "✓ Imported state: {} plans, {} sessions, {} diets",
        state.plans.len(),
        state.sessions.len(),
        state.diets.len()
    );
    Ok(())
}

fn plan_by_number(state: &AppState, number: usize) -> Result<uuid::Uuid> {
    state
        .plans
        .get(number.wrapping_sub(1))
        .map(|p| p.id)
        .ok_or_else(|| Error::NotFound(format!("No plan number {}", number)))
}

fn diet_by_number(state: &AppState, number: usize) -> Result<uuid::Uuid> {
    state
        .diets
        .get(number.wrapping_sub(1))
        .map(|d| d.id)
        .ok_or_else(|| Error::NotFound(format!("No diet number {}", number)))
}

fn active_plan_id(state: &AppState) -> Result<uuid::Uuid> {
    state
        .active_plan_id
        .ok_or_else(|| Error::State("No active plan".into()))
}

fn active_diet_id(state: &AppState) -> Result<uuid::Uuid> {
    state
        .active_diet_id
        .ok_or_else(|| Error::State("No active diet".into()))
}

fn day_by_name(state: &AppState, plan_id: uuid::Uuid, name: &str) -> Result<uuid::Uuid> {
    let plan = state
        .plan(plan_id)
        .ok_or_else(|| Error::NotFound("Plan not found".into()))?;
    plan.days
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
        .map(|d| d.id)
        .ok_or_else(|| Error::NotFound(format!("No day named '{}' in plan", name)))
}

fn cmd_plan(state_path: &std::path::Path, command: PlanCommands) -> Result<()> {
    match command {
        PlanCommands::List => {
            let state = AppState::load(state_path)?;
            if state.plans.is_empty() {
                println!("No plans yet. Try `liftlog plan starter`.");
                return Ok(());
            }
            for (i, plan) in state.plans.iter().enumerate() {
                let marker = if state.active_plan_id == Some(plan.id) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{:>3}.{} {}  ({} days)",
                    i + 1,
                    marker,
                    plan.name,
                    plan.days.len()
                );
            }
        }
        PlanCommands::Create { name } => {
            let mut state = AppState::load(state_path)?;
            plan::create_plan(&mut state, &name)?;
            state.save(state_path)?;
            println!("✓ Created plan '{}'", name.trim());
        }
        PlanCommands::Starter => {
            let mut state = AppState::load(state_path)?;
            let id = load_starter_plan(&mut state);
            state.save(state_path)?;
            let plan = state.plan(id).ok_or_else(|| Error::State("starter plan missing".into()))?;
            println!("✓ Installed starter plan '{}' ({} days)", plan.name, plan.days.len());
        }
        PlanCommands::Use { number } => {
            let mut state = AppState::load(state_path)?;
            let id = plan_by_number(&state, number)?;
            plan::set_active_plan(&mut state, id)?;
            state.save(state_path)?;
            println!("✓ Active plan set");
        }
        PlanCommands::Rename { number, name } => {
            let mut state = AppState::load(state_path)?;
            let id = plan_by_number(&state, number)?;
            plan::rename_plan(&mut state, id, &name)?;
            state.save(state_path)?;
            println!("✓ Plan renamed");
        }
        PlanCommands::Duplicate { number } => {
            let mut state = AppState::load(state_path)?;
            let id = plan_by_number(&state, number)?;
            let copy_id = plan::duplicate_plan(&mut state, id)?;
            state.save(state_path)?;
            let copy = state
                .plan(copy_id)
                .ok_or_else(|| Error::State("duplicated plan missing".into()))?;
            println!("✓ Created '{}'", copy.name);
        }
        PlanCommands::Delete { number } => {
            let mut state = AppState::load(state_path)?;
            let id = plan_by_number(&state, number)?;
            plan::delete_plan(&mut state, id)?;
            state.save(state_path)?;
            println!("✓ Plan deleted");
        }
        PlanCommands::Show => {
            let state = AppState::load(state_path)?;
            let plan = state
                .active_plan()
                .ok_or_else(|| Error::State("No active plan".into()))?;
            println!("{}", plan.name);
            for day in &plan.days {
                println!("  {}", plan::day_label(day));
                for ex in &day.exercises {
                    println!(
                        "    {}  {} x {}-{}  rest {}",
                        ex.name,
                        ex.scheme.sets,
                        ex.scheme.rep_min,
                        ex.scheme.rep_max,
                        ex.scheme.rest
                    );
                }
            }
        }
        PlanCommands::AddDay { name, weekday } => {
            let mut state = AppState::load(state_path)?;
            let plan_id = active_plan_id(&state)?;
            plan::add_day(&mut state, plan_id, &name, weekday)?;
            state.save(state_path)?;
            println!("✓ Added day '{}'", name.trim());
        }
        PlanCommands::DuplicateDay { day } => {
            let mut state = AppState::load(state_path)?;
            let plan_id = active_plan_id(&state)?;
            let day_id = day_by_name(&state, plan_id, &day)?;
            plan::duplicate_day(&mut state, plan_id, day_id)?;
            state.save(state_path)?;
            println!("✓ Duplicated day '{}'", day.trim());
        }
        PlanCommands::DeleteDay { day } => {
            let mut state = AppState::load(state_path)?;
            let plan_id = active_plan_id(&state)?;
            let day_id = day_by_name(&state, plan_id, &day)?;
            plan::delete_day(&mut state, plan_id, day_id)?;
            state.save(state_path)?;
            println!("✓ Deleted day '{}'", day.trim());
        }
        PlanCommands::MoveDay { from, to } => {
            let mut state = AppState::load(state_path)?;
            let plan_id = active_plan_id(&state)?;
            let moved =
                plan::move_day(&mut state, plan_id, from.wrapping_sub(1), to.wrapping_sub(1))?;
            if moved {
                state.save(state_path)?;
                println!("✓ Day moved");
            } else {
                println!("Nothing to move.");
            }
        }
        PlanCommands::AddExercise {
            day,
            name,
            sets,
            rep_min,
            rep_max,
            rest,
        } => {
            let mut state = AppState::load(state_path)?;
            let plan_id = active_plan_id(&state)?;
            let day_id = day_by_name(&state, plan_id, &day)?;
            let target = ExerciseTarget {
                name: name.clone(),
                scheme: RepScheme {
                    sets,
                    rep_min,
                    rep_max,
                    rest,
                },
            };
            plan::add_exercise(&mut state, plan_id, day_id, target)?;
            state.save(state_path)?;
            println!("✓ Added '{}' to '{}'", name.trim(), day.trim());
        }
        PlanCommands::RemoveExercise { day, number } => {
            let mut state = AppState::load(state_path)?;
            let plan_id = active_plan_id(&state)?;
            let day_id = day_by_name(&state, plan_id, &day)?;
            plan::remove_exercise(&mut state, plan_id, day_id, number.wrapping_sub(1))?;
            state.save(state_path)?;
            println!("✓ Exercise removed");
        }
        PlanCommands::MoveExercise { day, from, to } => {
            let mut state = AppState::load(state_path)?;
            let plan_id = active_plan_id(&state)?;
            let day_id = day_by_name(&state, plan_id, &day)?;
            let moved = plan::move_exercise(
                &mut state,
                plan_id,
                day_id,
                from.wrapping_sub(1),
                to.wrapping_sub(1),
            )?;
            if moved {
                state.save(state_path)?;
                println!("✓ Exercise moved");
            } else {
                println!("Nothing to move.");
            }
        }
    }
    Ok(())
}

fn cmd_diet(state_path: &std::path::Path, command: DietCommands) -> Result<()> {
    match command {
        DietCommands::List => {
            let state = AppState::load(state_path)?;
            if state.diets.is_empty() {
                println!("No diets yet.");
                return Ok(());
            }
            for (i, d) in state.diets.iter().enumerate() {
                let marker = if state.active_diet_id == Some(d.id) {
                    "*"
                } else {
                    " "
                };
                println!("{:>3}.{} {}", i + 1, marker, d.name);
            }
        }
        DietCommands::Create { name } => {
            let mut state = AppState::load(state_path)?;
            diet::create_diet(&mut state, &name)?;
            state.save(state_path)?;
            println!("✓ Created diet '{}'", name.trim());
        }
        DietCommands::Use { number } => {
            let mut state = AppState::load(state_path)?;
            let id = diet_by_number(&state, number)?;
            diet::set_active_diet(&mut state, id)?;
            state.save(state_path)?;
            println!("✓ Active diet set");
        }
        DietCommands::Rename { number, name } => {
            let mut state = AppState::load(state_path)?;
            let id = diet_by_number(&state, number)?;
            diet::rename_diet(&mut state, id, &name)?;
            state.save(state_path)?;
            println!("✓ Diet renamed");
        }
        DietCommands::Duplicate { number } => {
            let mut state = AppState::load(state_path)?;
            let id = diet_by_number(&state, number)?;
            let copy_id = diet::duplicate_diet(&mut state, id)?;
            state.save(state_path)?;
            let copy = state
                .diets
                .iter()
                .find(|d| d.id == copy_id)
                .ok_or_else(|| Error::State("duplicated diet missing".into()))?;
            println!("✓ Created '{}'", copy.name);
        }
        DietCommands::Delete { number } => {
            let mut state = AppState::load(state_path)?;
            let id = diet_by_number(&state, number)?;
            diet::delete_diet(&mut state, id)?;
            state.save(state_path)?;
            println!("✓ Diet deleted");
        }
        DietCommands::Show => {
            let state = AppState::load(state_path)?;
            let active = state
                .active_diet()
                .ok_or_else(|| Error::State("No active diet".into()))?;
            println!("{}", active.name);
            for (d, day) in active.week.iter().enumerate() {
                println!("  Day {}", d + 1);
                for (m, meal) in day.meals.iter().enumerate() {
                    if meal.is_empty() {
                        continue;
                    }
                    println!("    Meal {}", m + 1);
                    for item in meal {
                        println!("      {}  {} {}", item.food, fmt_num(item.qty), item.unit);
                    }
                }
            }
        }
        DietCommands::AddFood {
            day,
            meal,
            food,
            qty,
            unit,
        } => {
            let mut state = AppState::load(state_path)?;
            let id = active_diet_id(&state)?;
            let item = FoodItem {
                food: food.clone(),
                qty,
                unit,
            };
            diet::add_food(
                &mut state,
                id,
                day.wrapping_sub(1),
                meal.wrapping_sub(1),
                item,
            )?;
            state.save(state_path)?;
            println!("✓ Added '{}' to day {} meal {}", food.trim(), day, meal);
        }
        DietCommands::RemoveFood { day, meal, number } => {
            let mut state = AppState::load(state_path)?;
            let id = active_diet_id(&state)?;
            diet::remove_food(
                &mut state,
                id,
                day.wrapping_sub(1),
                meal.wrapping_sub(1),
                number.wrapping_sub(1),
            )?;
            state.save(state_path)?;
            println!("✓ Food removed");
        }
        DietCommands::CopyDay { day } => {
            let mut state = AppState::load(state_path)?;
            let id = active_diet_id(&state)?;
            diet::copy_day_to_all(&mut state, id, day.wrapping_sub(1))?;
            state.save(state_path)?;
            println!("✓ Day {} copied to the whole week", day);
        }
        DietCommands::CopyMeal { day, meal } => {
            let mut state = AppState::load(state_path)?;
            let id = active_diet_id(&state)?;
            diet::copy_meal_to_all_days(&mut state, id, day.wrapping_sub(1), meal.wrapping_sub(1))?;
            state.save(state_path)?;
            println!("✓ Meal {} of day {} copied to every day", meal, day);
        }
        DietCommands::Grocery => {
            let state = AppState::load(state_path)?;
            let active = state
                .active_diet()
                .ok_or_else(|| Error::State("No active diet".into()))?;
            let list = diet::grocery_list(active);
            if list.is_empty() {
                println!("Grocery list is empty.");
                return Ok(());
            }
            println!("Grocery list for '{}':", active.name);
            for line in list {
                println!("  {}  {} {}", line.food, fmt_num(line.qty), line.unit);
            }
        }
    }
    Ok(())
}
