use crate::infra::{in_memory_marketplace, local_instant, parse_date, parse_time, MemoryMarketplace};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use sathi_seva::config::MarketplaceConfig;
use sathi_seva::error::AppError;
use sathi_seva::marketplace::matching::tags;
use sathi_seva::marketplace::{
    ApplicationDecision, FixedClock, Job, JobDraft, ProfileUpdate, TagRequest,
    TagSuggestionService, UserId,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Marketplace date for the walk-through (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Local wall-clock time the schedule is evaluated at (HH:MM). Defaults to 11:00.
    #[arg(long, value_parser = parse_time)]
    pub(crate) at: Option<NaiveTime>,
    /// Reject the worker's application instead of accepting it.
    #[arg(long)]
    pub(crate) reject: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TagsArgs {
    /// Job description to derive tags from
    pub(crate) description: String,
    /// Optional job title, matched together with the description
    #[arg(long)]
    pub(crate) title: Option<String>,
}

pub(crate) fn run_tag_suggestion(args: TagsArgs) -> Result<(), AppError> {
    let suggestion = TagSuggestionService::keyword_only().suggest(&TagRequest {
        title: args.title,
        description: args.description,
    });

    if suggestion.tags.is_empty() {
        println!("No tags matched; add tags manually when posting the job.");
    } else {
        println!("Suggested tags: {}", suggestion.tags.join(", "));
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { date, at, reject } = args;
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let at = at.unwrap_or_else(|| NaiveTime::from_hms_opt(11, 0, 0).unwrap_or_default());

    let config = MarketplaceConfig::default();
    let clock = Arc::new(FixedClock(local_instant(&config, date, at)));
    let marketplace = in_memory_marketplace(&config, clock);

    let client = UserId::new("client-asha");
    let neighbour = UserId::new("client-vikram");
    let worker = UserId::new("worker-ravi");

    println!("Sathi Seva marketplace demo ({date} {})", at.format("%H:%M"));
    seed_profiles(&marketplace, &client, &neighbour, &worker)?;

    let description = "Kitchen sink pipe is leaking, needs a plumber with own tools";
    let suggestion = marketplace.tags.suggest(&TagRequest {
        title: Some("Plumber for kitchen".to_string()),
        description: description.to_string(),
    });
    println!("\nTag suggestions for the plumbing job: {}", suggestion.tags.join(", "));

    let plumbing = marketplace.jobs.post_job(JobDraft {
        client_id: client.clone(),
        title: "Plumber for kitchen".to_string(),
        description: description.to_string(),
        location: "Kothrud, Pune".to_string(),
        amount: 600.0,
        duration: Some("2 hours".to_string()),
        scheduled_date: date,
        scheduled_time: NaiveTime::from_hms_opt(8, 0, 0),
        required_tags: suggestion.tags,
    })?;
    let wiring = marketplace.jobs.post_job(JobDraft {
        client_id: neighbour.clone(),
        title: "Rewire living room switchboard".to_string(),
        description: "Replace two old switchboards".to_string(),
        location: "Baner, Pune".to_string(),
        amount: 900.0,
        duration: Some("Half day".to_string()),
        scheduled_date: date,
        scheduled_time: NaiveTime::from_hms_opt(14, 0, 0),
        required_tags: vec!["Wiring".to_string(), "Electrical Work".to_string()],
    })?;
    marketplace.jobs.post_job(JobDraft {
        client_id: worker.clone(),
        title: "Cook for a family dinner".to_string(),
        description: "Dinner for six on Saturday".to_string(),
        location: "Kothrud, Pune".to_string(),
        amount: 700.0,
        duration: None,
        scheduled_date: date,
        scheduled_time: None,
        required_tags: vec!["Cooking".to_string()],
    })?;

    println!("\nFeed for {worker} (skills matched, own postings hidden)");
    let skills = marketplace.profiles.ensure_profile(&worker)?.skills;
    for job in marketplace.feed_for(&worker) {
        println!(
            "  - {} | Rs {:.0} | matched on {}",
            job.title,
            job.amount,
            tags::shared_tags(&skills, &job.required_tags).join(", ")
        );
    }
    println!("Jobs posted in {worker}'s city");
    print_jobs(&marketplace.local_feed_for(&worker));

    println!("\nApplications");
    for job in [&plumbing, &wiring] {
        let receipt = marketplace.applications.apply(&job.id, &worker, None)?;
        println!(
            "- {} applied to '{}' posted by {} -> {}",
            worker,
            job.title,
            receipt
                .employer
                .display_name
                .as_deref()
                .unwrap_or(receipt.employer.client_id.as_str()),
            receipt.application.status
        );
    }
    if let Err(err) = marketplace.applications.apply(&plumbing.id, &worker, None) {
        println!("- Second application to '{}' refused: {err}", plumbing.title);
    }

    let applicants = marketplace.applications.applications_for_job(&plumbing.id);
    let decision = if reject {
        ApplicationDecision::Rejected
    } else {
        ApplicationDecision::Accepted
    };
    for application in &applicants {
        let decided = marketplace.applications.decide(&application.id, decision)?;
        println!("- {client} marked application {} as {}", decided.id, decided.status);
    }

    println!("\nSchedule for {worker}");
    for entry in marketplace.applications.build_schedule(&worker) {
        println!(
            "- {} on {} at {} ({}) application {} -> {}",
            entry.job.title,
            entry.job.scheduled_date,
            entry.job.scheduled_time.as_deref().unwrap_or("00:00"),
            entry.job.duration.as_deref().unwrap_or("1 hour"),
            entry.application.status,
            entry.status.label()
        );
    }

    println!("\nJobs involving {client}");
    print_jobs(&marketplace.jobs.jobs_for_user(&client));
    Ok(())
}

fn seed_profiles(
    marketplace: &MemoryMarketplace,
    client: &UserId,
    neighbour: &UserId,
    worker: &UserId,
) -> Result<(), AppError> {
    for (user_id, name, skills) in [
        (client, "Asha Kulkarni", Vec::new()),
        (neighbour, "Vikram Joshi", Vec::new()),
        (worker, "Ravi Patil", vec!["Plumbing", "Pipe Repair", "Wiring"]),
    ] {
        marketplace.profiles.update_skills(user_id, skills)?;
        marketplace.profiles.update_details(
            user_id,
            ProfileUpdate {
                full_name: Some(name.to_string()),
                city: Some("Pune".to_string()),
                ..ProfileUpdate::default()
            },
        )?;
    }
    Ok(())
}

fn print_jobs(jobs: &[Job]) {
    if jobs.is_empty() {
        println!("  (none)");
    }
    for job in jobs {
        let tags: Vec<&str> = job.required_tags.iter().map(String::as_str).collect();
        println!(
            "  - [{}] {} | Rs {:.0} | {} | tags: {}",
            job.status,
            job.title,
            job.amount,
            job.location,
            tags.join(", ")
        );
    }
}
