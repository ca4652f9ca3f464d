use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use ironlog_core::analytics::{self, ProgressSnapshot, TimeRange};
use ironlog_core::clock::{Ticker, TICK};
use ironlog_core::nutrition;
use ironlog_core::progression::load_previous_sets;
use ironlog_core::templates::{find_template, validate_against_catalog};
use ironlog_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "ironlog")]
#[command(about = "Strength training and nutrition tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or replace the user profile
    Onboard {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        /// Height in cm
        #[arg(long)]
        height: f64,
        /// Weight in kg
        #[arg(long)]
        weight: f64,
        /// lose-weight, build-muscle, recomposition, maintain-weight
        #[arg(long, default_value = "build-muscle")]
        goal: FitnessGoal,
        /// beginner, intermediate, advanced
        #[arg(long, default_value = "beginner")]
        level: ExperienceLevel,
        /// Training days per week
        #[arg(long, default_value_t = 3)]
        days: u32,
        /// Comma-separated equipment list (default: everything)
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<Equipment>,
    },

    /// Show the profile and daily targets, optionally updating fields
    Profile {
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        goal: Option<FitnessGoal>,
    },

    /// List the bundled program templates
    Programs,

    /// Start a program from a template (replaces the active one)
    Activate {
        /// Template id, e.g. upper_lower_beginner
        template: String,
    },

    /// Show today's planned workout
    Today,

    /// Run today's workout interactively
    Workout {
        /// Log every prescribed set automatically and finish (for testing)
        #[arg(long, conflicts_with = "cancel")]
        auto_complete: bool,

        /// Start and immediately cancel the workout
        #[arg(long)]
        cancel: bool,
    },

    /// Record a body measurement
    Measure {
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        body_fat: Option<f64>,
        #[arg(long)]
        chest: Option<f64>,
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        hips: Option<f64>,
        #[arg(long)]
        neck: Option<f64>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Log food eaten today
    Eat {
        /// Food name (matched against saved foods, or created when macros are given)
        food: String,
        #[arg(long, default_value_t = 1.0)]
        servings: f64,
        #[arg(long, default_value = "snack")]
        meal: MealType,
        #[arg(long)]
        calories: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
        /// Serving size in grams for a new food
        #[arg(long, default_value_t = 100.0)]
        serving_g: f64,
    },

    /// Show a day's nutrition against targets
    Nutrition {
        /// Day to show (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Add water in ml to today's log (not allowed with a past --date)
        #[arg(long)]
        water: Option<u32>,
    },

    /// Training statistics and progress
    Stats {
        /// History window: 1m, 3m, 6m, 1y, all (default: analytics.history_days)
        #[arg(long)]
        range: Option<TimeRange>,
    },

    /// Export every logged set to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ironlog_core::logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Data directory: {:?}", data_dir);
    let mut store = FileStore::open(data_dir);

    let catalog = build_default_catalog();
    let mut errors = catalog.validate();
    errors.extend(validate_against_catalog(&catalog));
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Onboard {
            name,
            age,
            height,
            weight,
            goal,
            level,
            days,
            equipment,
        } => {
            let mut profile = UserProfile::new(name, age, height, weight, goal, level, days);
            if !equipment.is_empty() {
                profile.available_equipment = equipment;
            }
            cmd_onboard(&mut store, profile)
        }
        Commands::Profile { weight, days, goal } => cmd_profile(&mut store, weight, days, goal),
        Commands::Programs => cmd_programs(&store),
        Commands::Activate { template } => cmd_activate(&mut store, &template),
        Commands::Today => cmd_today(&store, &catalog, &config),
        Commands::Workout {
            auto_complete,
            cancel,
        } => cmd_workout(&mut store, &config, auto_complete, cancel),
        Commands::Measure {
            weight,
            body_fat,
            chest,
            waist,
            hips,
            neck,
            notes,
        } => {
            let mut m = BodyMeasurement::new(Utc::now());
            m.weight_kg = weight;
            m.body_fat_percentage = body_fat;
            m.chest_cm = chest;
            m.waist_cm = waist;
            m.hips_cm = hips;
            m.neck_cm = neck;
            m.notes = notes;
            cmd_measure(&mut store, m)
        }
        Commands::Eat {
            food,
            servings,
            meal,
            calories,
            protein,
            carbs,
            fat,
            serving_g,
        } => {
            let macros = calories.map(|kcal| (serving_g, kcal, protein, carbs, fat));
            cmd_eat(&mut store, &food, servings, meal, macros)
        }
        Commands::Nutrition { date, water } => cmd_nutrition(&mut store, date, water),
        Commands::Stats { range } => cmd_stats(&store, &config, range),
        Commands::Export { out } => cmd_export(&store, out),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn require_profile(store: &dyn Store) -> Result<UserProfile> {
    store
        .profile()?
        .ok_or_else(|| Error::NotFound("no profile yet; run `ironlog onboard` first".into()))
}

fn print_targets(profile: &UserProfile) {
    let targets = profile.macro_targets();
    println!("  BMI:          {:.1}", profile.bmi());
    println!("  Maintenance:  {} kcal", targets.maintenance_calories);
    println!("  Target:       {} kcal ({})", targets.target_calories, profile.goal);
    println!(
        "  Macros:       {} g protein · {} g fat · {} g carbs",
        targets.protein_g, targets.fat_g, targets.carbs_g
    );
}

fn cmd_onboard(store: &mut dyn Store, profile: UserProfile) -> Result<()> {
    profile.validate()?;
    store.save_profile(&profile)?;

    println!("✓ Profile saved for {}", profile.name);
    print_targets(&profile);
    println!();
    println!("Next: `ironlog programs` to pick a program.");
    Ok(())
}

fn cmd_profile(
    store: &mut dyn Store,
    weight: Option<f64>,
    days: Option<u32>,
    goal: Option<FitnessGoal>,
) -> Result<()> {
    let mut profile = require_profile(store)?;
    let changed = weight.is_some() || days.is_some() || goal.is_some();
    if let Some(w) = weight {
        profile.weight_kg = w;
    }
    if let Some(d) = days {
        profile.days_per_week = d;
    }
    if let Some(g) = goal {
        profile.goal = g;
    }
    if changed {
        profile.validate()?;
        store.save_profile(&profile)?;
        println!("✓ Profile updated");
    }

    println!("{} · {} years · {:.0} cm · {:.1} kg", profile.name, profile.age, profile.height_cm, profile.weight_kg);
    println!(
        "  {} · {} · {} days/week",
        profile.goal, profile.experience_level, profile.days_per_week
    );
    print_targets(&profile);

    if let Some(program) = store.active_program()? {
        println!(
            "  Program:      {} (week {}, {:.0}% complete)",
            program.name,
            program.current_week,
            program.completion_percentage() * 100.0
        );
    }
    Ok(())
}

fn cmd_programs(store: &dyn Store) -> Result<()> {
    let active = store.active_program()?;
    for template in list_templates() {
        let marker = match &active {
            Some(p) if p.template_id.as_deref() == Some(template.id) => "*",
            _ => " ",
        };
        println!(
            "{} {:<22} {} ({} weeks × {} days, {})",
            marker,
            template.id,
            template.name,
            template.duration_weeks,
            template.days_per_week,
            template.level
        );
        println!("    {}", template.subtitle);
    }
    Ok(())
}

fn cmd_activate(store: &mut dyn Store, template_id: &str) -> Result<()> {
    let template = find_template(template_id)
        .ok_or_else(|| Error::NotFound(format!("unknown template '{}'", template_id)))?;
    let program = store.activate_program(template.build(), Utc::now())?;

    println!("✓ Activated {}", program.name);
    if let Some(day) = program.todays_workout() {
        println!("  First workout: {}", day.name);
    }
    Ok(())
}

fn cmd_today(store: &dyn Store, catalog: &ExerciseCatalog, config: &Config) -> Result<()> {
    let Some(program) = store.active_program()? else {
        println!("No active program. Run `ironlog activate <template>`.");
        return Ok(());
    };

    println!(
        "{} · week {}/{} · {:.0}% complete",
        program.name,
        program.current_week,
        program.duration_weeks,
        program.completion_percentage() * 100.0
    );
    let Some(day) = program.todays_workout() else {
        println!("No workout scheduled today.");
        return Ok(());
    };

    println!("{} ({}, ~{} min)", day.name, day.focus, day.estimated_minutes);
    let history = store.workout_logs()?;
    let previous = load_previous_sets(day, &history);

    for exercise in &day.exercises {
        let muscle = catalog
            .lookup(&exercise.exercise_id)
            .map(|e| format!(" [{:?}]", e.primary_muscle))
            .unwrap_or_default();
        let hint = previous
            .get(&exercise.exercise_id)
            .and_then(|sets| {
                let weight = suggested_weight(sets, &config.progression)?;
                Some(format!("  → try {:.1} kg", weight))
            })
            .unwrap_or_default();
        println!(
            "  {}. {}{} · {} · rest {}s{}",
            exercise.order_index + 1,
            exercise.exercise_name,
            muscle,
            exercise.sets_summary(),
            exercise.rest_seconds,
            hint
        );
    }
    Ok(())
}

enum WorkoutEvent {
    Tick,
    Line(String),
    InputClosed,
}

fn cmd_workout(
    store: &mut dyn Store,
    config: &Config,
    auto_complete: bool,
    cancel: bool,
) -> Result<()> {
    let mut session = WorkoutSession::new(config);
    session.start_today(store)?;
    print_status(&session);

    if cancel {
        session.cancel();
        println!("Workout cancelled. Nothing was saved.");
        return Ok(());
    }

    if auto_complete {
        run_auto(&mut session)?;
        return finish_workout(&mut session, store).map(|_| ());
    }

    run_interactive(&mut session, store)
}

fn run_auto(session: &mut WorkoutSession) -> Result<()> {
    loop {
        match session.phase() {
            SessionPhase::Exercising => {
                let (reps, weight) = match session.current_exercise() {
                    Some(ex) => (
                        ex.rep_min.to_string(),
                        session
                            .suggested_weight()
                            .map(|w| w.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    None => break,
                };
                let rpe = session.pending().rpe;
                session.log_set(&weight, &reps, rpe)?;
            }
            SessionPhase::Resting => {
                session.skip_rest()?;
            }
            SessionPhase::Complete | SessionPhase::Idle => break,
        }
        session.tick();
    }
    Ok(())
}

fn run_interactive(session: &mut WorkoutSession, store: &mut dyn Store) -> Result<()> {
    println!("Enter `<weight> <reps> [rpe]` to log a set (`-` for bodyweight).");
    println!("  r: skip rest · x: skip exercise · f: finish · q: cancel");

    let (tx, rx) = mpsc::channel::<WorkoutEvent>();
    let mut ticker = Ticker::spawn(TICK, tx.clone(), || WorkoutEvent::Tick);

    // stdin blocks, so this thread is left detached; it ends with the process
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(WorkoutEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(WorkoutEvent::InputClosed);
    });
    prompt()?;

    for event in rx.iter() {
        match event {
            WorkoutEvent::Tick => {
                let before = session.phase();
                let after = session.tick();
                if before == SessionPhase::Resting && after != SessionPhase::Resting {
                    println!("\nRest over.");
                    print_status(session);
                    prompt()?;
                }
            }
            WorkoutEvent::Line(line) => match line.trim() {
                "f" => match finish_workout(session, store) {
                    Ok(_) => break,
                    Err(Error::Persistence(msg)) => {
                        tracing::warn!("Finishing workout failed: {}", msg);
                        eprintln!("Could not save workout: {}. Enter `f` to retry.", msg);
                        prompt()?;
                    }
                    Err(e) => return Err(e),
                },
                "q" => {
                    session.cancel();
                    println!("Workout cancelled. Nothing was saved.");
                    break;
                }
                "r" => {
                    report(session.skip_rest());
                    print_status(session);
                    prompt()?;
                }
                "x" => {
                    report(session.skip_exercise());
                    print_status(session);
                    prompt()?;
                }
                "" => {
                    print_status(session);
                    prompt()?;
                }
                input => {
                    report(log_from_input(session, input));
                    print_status(session);
                    prompt()?;
                }
            },
            WorkoutEvent::InputClosed => {
                session.cancel();
                println!("\nInput closed. Workout cancelled, nothing was saved.");
                break;
            }
        }
    }

    ticker.stop();
    Ok(())
}

fn log_from_input(session: &mut WorkoutSession, input: &str) -> Result<SessionPhase> {
    let mut parts = input.split_whitespace();
    let weight = parts.next().unwrap_or_default();
    let reps = parts
        .next()
        .ok_or_else(|| Error::InvalidInput("expected `<weight> <reps> [rpe]`".into()))?;
    let rpe = match parts.next() {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| Error::InvalidInput(format!("RPE must be a number, got '{}'", raw)))?,
        None => session.pending().rpe,
    };
    session.log_set(weight, reps, rpe)
}

fn report(result: Result<SessionPhase>) {
    if let Err(e) = result {
        eprintln!("  {}", e);
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

fn print_status(session: &WorkoutSession) {
    let elapsed = session.elapsed_text();
    match session.phase() {
        SessionPhase::Exercising => {
            if let Some(ex) = session.current_exercise() {
                println!(
                    "[{}] {} · set {}/{} · {}",
                    elapsed,
                    ex.exercise_name,
                    session.current_set_number(),
                    ex.sets,
                    ex.rep_range_text()
                );
                if let Some(summary) = session.previous_summary() {
                    println!("       {}", summary);
                }
                if let Some(weight) = session.suggested_weight() {
                    println!("       Suggested: {:.1} kg", weight);
                }
            }
        }
        SessionPhase::Resting => {
            println!("[{}] Resting · {}s left", elapsed, session.rest_remaining());
        }
        SessionPhase::Complete => {
            println!("[{}] All exercises done. Enter `f` to finish.", elapsed);
        }
        SessionPhase::Idle => {}
    }
}

fn finish_workout(session: &mut WorkoutSession, store: &mut dyn Store) -> Result<FinishSummary> {
    let profile = store.profile()?;
    let mut program = store.active_program()?;
    let summary = session.finish(profile.as_ref(), program.as_mut(), store, Utc::now())?;

    println!("\n✓ Workout saved: {} in {}", summary.log.day_name, summary.log.duration_text());
    println!(
        "  {} sets · {:.0} kg volume",
        summary.log.sets.len(),
        summary.log.total_volume()
    );
    for record in &summary.new_records {
        println!("  🏆 New PR: {} {}", record.exercise_name, record.display_text());
    }
    if let Some(next) = &summary.next_day {
        println!("  Next up: {}", next);
    }
    Ok(summary)
}

fn cmd_measure(store: &mut dyn Store, measurement: BodyMeasurement) -> Result<()> {
    store.insert_measurement(&measurement)?;
    println!("✓ Measurement saved");

    if let Some(w) = measurement.weight_kg {
        println!("  Weight:    {:.1} kg", w);
    }
    if let (Some(lean), Some(fat)) = (measurement.lean_mass_kg(), measurement.fat_mass_kg()) {
        println!("  Lean mass: {:.1} kg", lean);
        println!("  Fat mass:  {:.1} kg", fat);
    }
    if let Some(profile) = store.profile()? {
        if let Some(ratio) = measurement.waist_to_height_ratio(profile.height_cm) {
            println!("  Waist/height: {:.2}", ratio);
        }
    }
    Ok(())
}

fn cmd_eat(
    store: &mut dyn Store,
    name: &str,
    servings: f64,
    meal: MealType,
    macros: Option<(f64, f64, f64, f64, f64)>,
) -> Result<()> {
    let foods = store.food_items()?;
    let existing = foods
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
        .cloned();

    let food = match (existing, macros) {
        (Some(food), _) => food,
        (None, Some((serving_g, kcal, protein, carbs, fat))) => {
            nutrition::create_custom_food(store, name, serving_g, kcal, protein, carbs, fat)?
        }
        (None, None) => {
            let suggestions: Vec<&str> = nutrition::search_foods(&foods, name)
                .into_iter()
                .map(|f| f.name.as_str())
                .collect();
            let hint = if suggestions.is_empty() {
                "pass --calories to create it".to_string()
            } else {
                format!("did you mean: {}", suggestions.join(", "))
            };
            return Err(Error::NotFound(format!("food '{}' ({})", name, hint)));
        }
    };

    let entry = nutrition::log_food(store, today(), &food, meal, servings, Utc::now())?;
    println!(
        "✓ {} × {} ({}) · {:.0} kcal",
        entry.food_name,
        servings,
        meal,
        entry.totals().calories
    );
    Ok(())
}

fn cmd_nutrition(store: &mut dyn Store, date: Option<NaiveDate>, water: Option<u32>) -> Result<()> {
    let day = date.unwrap_or_else(today);
    if water.is_some() && day != today() {
        return Err(Error::InvalidInput(format!(
            "--water only adds to today's log, not {}",
            day
        )));
    }
    let mut log = if day == today() {
        nutrition::today_log(store, day)?
    } else {
        nutrition::log_for_date(store, day)?
    };

    if let Some(ml) = water {
        log.add_water(ml);
        store.save_nutrition_log(&log)?;
    }

    println!("Nutrition for {}", day);
    for (meal, entries) in log.entries_by_meal() {
        println!("  {}", meal);
        for entry in entries {
            println!(
                "    {} × {} · {:.0} kcal",
                entry.food_name,
                entry.serving_multiplier,
                entry.totals().calories
            );
        }
    }

    let totals = log.totals();
    println!(
        "  Total: {:.0} kcal · {:.0} g protein · {:.0} g carbs · {:.0} g fat · {} ml water",
        totals.calories, totals.protein_g, totals.carbs_g, totals.fat_g, log.water_ml
    );

    if let Some(profile) = store.profile()? {
        let targets = profile.macro_targets();
        println!(
            "  Calories: {:.0}% of {} ({:.0} left)",
            nutrition::calorie_progress(&log, targets.target_calories) * 100.0,
            targets.target_calories,
            nutrition::remaining_calories(&log, targets.target_calories)
        );
        println!(
            "  Protein:  {:.0}% of {} g",
            nutrition::macro_progress(totals.protein_g, targets.protein_g) * 100.0,
            targets.protein_g
        );
    }
    Ok(())
}

fn cmd_stats(store: &dyn Store, config: &Config, range: Option<TimeRange>) -> Result<()> {
    let logs = store.workout_logs()?;
    let snapshot = ProgressSnapshot::compute(&logs, config.analytics.weekly_weeks, today());

    println!("Streak:          {} days", snapshot.current_streak);
    println!("Total workouts:  {}", snapshot.total_workouts);
    println!("Total volume:    {:.0} kg", snapshot.total_volume_kg);

    println!("Weekly workouts:");
    for week in &snapshot.weekly_counts {
        println!("  {}  {}", week.week_start, "■".repeat(week.count));
    }

    let days = analytics::history_window(range, &config.analytics);
    let recent = analytics::workout_history(&logs, days, Utc::now());
    println!("Last {} days: {} workouts", days, recent.len());
    for log in recent.iter().rev().take(5) {
        println!(
            "  {}  {} · {} · {:.0} kg",
            analytics::local_day(log.date),
            log.day_name,
            log.duration_text(),
            log.total_volume()
        );
    }

    let records = store.personal_records()?;
    if !records.is_empty() {
        println!("Personal records:");
        for record in analytics::personal_records_by_recency(&records).into_iter().take(10) {
            println!("  {:<28} {}", record.exercise_name, record.display_text());
        }
    }

    let measurements = store.measurements()?;
    if let Some(latest) = analytics::latest_measurement(&measurements) {
        let weights = analytics::weight_history(&measurements);
        if let (Some(first), Some(w)) = (weights.first(), latest.weight_kg) {
            println!("Bodyweight: {:.1} kg ({:+.1} kg since {})", w, w - first.1, analytics::local_day(first.0));
        }
    }
    Ok(())
}

fn cmd_export(store: &dyn Store, out: PathBuf) -> Result<()> {
    let logs = store.workout_logs()?;
    let rows = export_sets_csv(&logs, &out)?;
    println!("✓ Exported {} sets to {}", rows, out.display());
    Ok(())
}
