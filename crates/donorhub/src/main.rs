//! `donorhub` - CLI for the local blood-donor registry
//!
//! This binary provides the command-line interface for submitting donor
//! applications, browsing the donor directory, and managing the local
//! profile.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use donorhub::auth::{AuthService, StoredProfileAuth};
use donorhub::cli::{
    ApplyCommand, BannerCommand, Cli, Command, ConfigCommand, DonorsCommand, FeedbackCommand,
    OutputFormat, ProfileCommand, StatsCommand, UpdateProfileArgs,
};
use donorhub::directory::Directory;
use donorhub::donor::{ApplicationForm, DonorApplication};
use donorhub::feedback;
use donorhub::intake::Intake;
use donorhub::profile::{self, UserProfile};
use donorhub::store::{Store, BANNER_CLOSED_NAMESPACE};
use donorhub::{init_logging, Config};

// Single-threaded: every store, query and score operation runs to
// completion before the next command is processed.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        // Config commands never need the store
        Command::Config(cmd) => handle_config(&config, cmd),
        command => {
            let store = Store::open(config.database_path()).with_context(|| {
                format!("cannot open registry at {}", config.database_path().display())
            })?;

            match command {
                Command::Apply(cmd) => handle_apply(&store, &cmd).await,
                Command::Donors(cmd) => handle_donors(&store, &config, &cmd),
                Command::Stats(cmd) => handle_stats(&store, &cmd),
                Command::Profile(cmd) => handle_profile(&store, cmd),
                Command::Feedback(cmd) => handle_feedback(&store, cmd).await,
                Command::Banner(cmd) => handle_banner(&store, &cmd),
                Command::Config(_) => unreachable!("handled above"),
            }
        }
    }
}

/// Resolve the account profile, printing a login hint when absent.
async fn resolve_account(store: &Store) -> anyhow::Result<Option<UserProfile>> {
    let auth = StoredProfileAuth::new(store);
    match auth.get_user_details().await {
        Ok(account) => Ok(Some(account)),
        Err(e) if e.is_not_authenticated() => {
            println!("You must be logged in first.");
            println!("Save a profile to sign in: donorhub profile update --name ... --email ...");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

async fn handle_apply(store: &Store, cmd: &ApplyCommand) -> anyhow::Result<()> {
    let Some(account) = resolve_account(store).await? else {
        return Ok(());
    };

    // Pre-fill contact from the profile, the way the application form does
    let contact = cmd
        .contact
        .clone()
        .or_else(|| account.mobile.clone())
        .or_else(|| account.email.clone())
        .unwrap_or_default();

    let form = ApplicationForm {
        blood_type: cmd.blood_type,
        age: cmd.age,
        location: cmd.location.clone(),
        contact,
        last_donation: cmd.last_donation.clone(),
    };

    match Intake::new(store).submit(&account, &form) {
        Ok(application) => {
            println!("Application submitted successfully!");
            println!(
                "  #{} {} ({}) - {} - applied {}",
                application.id,
                application.name,
                application.blood_type,
                application.location,
                application.application_date
            );
            println!("  Status: {}", application.status);
        }
        Err(e) if e.is_duplicate() => {
            println!("You have already applied to be a donor!");
        }
        Err(e) if e.is_validation() => {
            println!("Application rejected: {e}");
        }
        Err(e) => return Err(anyhow::Error::new(e).context("failed to save donor application")),
    }
    Ok(())
}

fn handle_donors(store: &Store, config: &Config, cmd: &DonorsCommand) -> anyhow::Result<()> {
    let directory = Directory::new(store);
    let sort = cmd
        .sort
        .map_or(config.directory.default_sort, Into::into);
    let search = cmd.search.as_deref().unwrap_or_default();

    let mut donors = directory.search(cmd.blood_type, search, sort);

    let limit = cmd.limit.unwrap_or(config.directory.result_limit);
    if limit > 0 && donors.len() > limit {
        donors.truncate(limit);
    }

    if donors.is_empty() {
        println!("No donors found. Try adjusting your search or filters.");
        return Ok(());
    }

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&donors)?);
        }
        OutputFormat::Table => print_donor_table(&donors),
        OutputFormat::Plain => {
            for donor in &donors {
                println!(
                    "{} ({}) - {} - applied {} - {}",
                    donor.name,
                    donor.blood_type,
                    donor.location,
                    donor.application_date,
                    donor.status
                );
            }
        }
    }
    Ok(())
}

fn print_donor_table(donors: &[DonorApplication]) {
    println!(
        "{:<24} {:<6} {:<4} {:<18} {:<16} {:<12} {}",
        "Name", "Blood", "Age", "Location", "Contact", "Applied", "Status"
    );
    println!("{}", "-".repeat(92));
    for donor in donors {
        println!(
            "{:<24} {:<6} {:<4} {:<18} {:<16} {:<12} {}",
            donor.name,
            donor.blood_type.to_string(),
            donor.age,
            donor.location,
            donor.contact,
            donor.application_date,
            donor.status
        );
    }
}

fn handle_stats(store: &Store, cmd: &StatsCommand) -> anyhow::Result<()> {
    let stats = Directory::new(store).stats();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Donor registry statistics");
        println!("-------------------------");
        println!("Total donors:  {}", stats.total_donors);
        for (blood_type, count) in &stats.counts_by_blood_type {
            println!("{:<6} donors: {count}", blood_type.to_string());
        }
    }
    Ok(())
}

fn handle_profile(store: &Store, cmd: ProfileCommand) -> anyhow::Result<()> {
    match cmd {
        ProfileCommand::Show { json } => {
            let Some(saved) = profile::load_override(store) else {
                println!("No profile saved.");
                println!("Create one: donorhub profile update --name ... --email ...");
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&saved)?);
            } else {
                print_profile(&saved);
            }
        }
        ProfileCommand::Update(args) => {
            let mut updated =
                merge_profile(profile::load_override(store).unwrap_or_default(), args);
            if updated.id.is_none() {
                // First save; mint a local account id
                updated.id = Some(format!("local-{}", Utc::now().timestamp_millis()));
            }

            match profile::validate(&updated) {
                Ok(()) => {}
                Err(e) => {
                    println!("Profile not saved: {e}");
                    return Ok(());
                }
            }

            profile::save_override(store, &updated)
                .context("failed to save profile")?;
            println!(
                "Profile saved. Completion: {}%",
                profile::completeness(&updated)
            );
        }
        ProfileCommand::Clear => {
            if profile::clear_override(store)? {
                println!("Profile cleared. You are now logged out.");
            } else {
                println!("No profile to clear.");
            }
        }
    }
    Ok(())
}

fn print_profile(saved: &UserProfile) {
    let field = |value: &Option<String>| -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Not specified")
            .to_string()
    };

    println!("Profile");
    println!("-------");
    println!("Name:              {}", field(&saved.name));
    println!("Email:             {}", field(&saved.email));
    println!("Mobile:            {}", field(&saved.mobile));
    println!("Blood type:        {}", field(&saved.blood_type));
    println!("Age:               {}", field(&saved.age));
    println!("Gender:            {}", field(&saved.gender));
    println!("Present address:   {}", field(&saved.present_address));
    println!("Permanent address: {}", field(&saved.permanent_address));
    println!("Occupation:        {}", field(&saved.occupation));
    println!("Education:         {}", field(&saved.education));
    println!("Interests:         {}", field(&saved.interests));
    println!("Hobbies:           {}", field(&saved.hobbies));
    println!();
    println!("Profile completion: {}%", profile::completeness(saved));
}

/// Overlay provided flags onto the saved profile, keeping older values.
fn merge_profile(existing: UserProfile, args: UpdateProfileArgs) -> UserProfile {
    UserProfile {
        id: args.id.or(existing.id),
        name: args.name.or(existing.name),
        email: args.email.or(existing.email),
        mobile: args.mobile.or(existing.mobile),
        blood_type: args.blood_type.or(existing.blood_type),
        age: args.age.or(existing.age),
        gender: args.gender.or(existing.gender),
        present_address: args.present_address.or(existing.present_address),
        permanent_address: args.permanent_address.or(existing.permanent_address),
        occupation: args.occupation.or(existing.occupation),
        education: args.education.or(existing.education),
        interests: args.interests.or(existing.interests),
        hobbies: args.hobbies.or(existing.hobbies),
    }
}

async fn handle_feedback(store: &Store, cmd: FeedbackCommand) -> anyhow::Result<()> {
    let Some(account) = resolve_account(store).await? else {
        return Ok(());
    };

    match cmd {
        FeedbackCommand::Add {
            rating,
            mood,
            comment,
        } => match feedback::submit_feedback(store, &account, rating, mood, &comment) {
            Ok(entry) => {
                println!("Thanks for your feedback! ({} stars)", entry.rating);
            }
            Err(e) if e.is_validation() => {
                println!("Feedback rejected: {e}");
            }
            Err(e) => return Err(anyhow::Error::new(e).context("failed to save feedback")),
        },
        FeedbackCommand::List { json } => {
            let user_id = account.id.as_deref().unwrap_or_default();
            let entries = feedback::list_feedbacks(store, user_id);

            if entries.is_empty() {
                println!("No feedback yet.");
            } else if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    let stars = "*".repeat(usize::from(entry.rating));
                    println!("[{}] {:<5} {}", entry.date, stars, entry.comment);
                }
            }
        }
    }
    Ok(())
}

fn handle_banner(store: &Store, cmd: &BannerCommand) -> anyhow::Result<()> {
    match cmd {
        BannerCommand::Close => {
            store.set(BANNER_CLOSED_NAMESPACE, &true)?;
            println!("Donation banner dismissed.");
        }
        BannerCommand::Status => {
            let closed: bool = store.get_or_default(BANNER_CLOSED_NAMESPACE);
            if closed {
                println!("Donation banner is dismissed.");
            } else {
                println!("Donation banner is visible.");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Intake]");
                println!("  Donor age hint: {}-{}", config.intake.min_donor_age, config.intake.max_donor_age);
                println!();
                println!("[Directory]");
                println!("  Default sort:   {}", config.directory.default_sort);
                println!("  Result limit:   {}", config.directory.result_limit);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
