//! Utility to set a user's profile in the database
//! Usage: set_profile <user_id> <age> <height_in> <weight_lb> <sex> <activity> [calorie_goal]

use wellness::config::Config;
use wellness::db::{migrations, Database};
use wellness::tools::profile::{update_profile, ProfileChanges};

const USAGE: &str =
    "Usage: set_profile <user_id> <age> <height_in> <weight_lb> <sex> <activity> [calorie_goal]";

fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid {} '{}'\n{}", name, value, USAGE))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 6 || args.len() > 7 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let changes = ProfileChanges {
        age: Some(parse("age", &args[1])?),
        height_inches: Some(parse("height", &args[2])?),
        weight_pounds: Some(parse("weight", &args[3])?),
        sex: Some(args[4].clone()),
        activity_level: Some(args[5].clone()),
        calorie_goal: args.get(6).map(|g| parse("calorie goal", g)).transpose()?,
    };

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| migrations::run_migrations(conn))?;

    let response = update_profile(&database, &args[0], changes)?;

    println!("Profile set for {}:", response.profile.user_id);
    match response.energy {
        Some(energy) => {
            println!("  BMR:  {:.0} kcal", energy.bmr);
            println!("  TDEE: {} kcal/day", energy.tdee);
        }
        None => println!("  TDEE: missing {}", response.missing_fields.join(", ")),
    }
    if let Some(goal) = response.profile.calorie_goal {
        println!("  Calorie goal: {} kcal", goal);
    }
    println!("  Updated: {}", response.profile.updated_at);

    Ok(())
}
