use tracing::info;

use astrosolve::io::wcs::{HeaderEntry, HeaderValue};
use astrosolve::{Angle, Solver, SolverOptions};

use super::args::CliArgs;
use super::errors::AppError;

#[derive(Copy, Clone)]
enum AngleUnit {
    Hours,
    Degrees,
}

/// Parse a decimal or sexagesimal angle argument ("5.5", "5 34 31.9",
/// "-05:30:00").
fn parse_angle(arg: &'static str, value: &str, unit: AngleUnit) -> Result<Angle, AppError> {
    let invalid = || AppError::InvalidAngle {
        arg,
        value: value.to_string(),
    };

    let fields: Vec<&str> = value.split([' ', ':']).filter(|s| !s.is_empty()).collect();
    if fields.is_empty() || fields.len() > 3 {
        return Err(invalid());
    }

    let mut parts = [0.0f64; 3];
    for (i, field) in fields.iter().enumerate() {
        parts[i] = field.parse().map_err(|_| invalid())?;
    }

    Ok(match unit {
        AngleUnit::Hours => Angle::from_hms(parts[0], parts[1], parts[2]),
        AngleUnit::Degrees => Angle::from_dms(parts[0], parts[1], parts[2]),
    })
}

fn format_value(value: &HeaderValue) -> String {
    match value {
        HeaderValue::Bool(true) => "T".to_string(),
        HeaderValue::Bool(false) => "F".to_string(),
        HeaderValue::Number(n) => n.to_string(),
        HeaderValue::Text(s) => format!("'{}'", s),
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let ra = parse_angle("--ra", &args.ra, AngleUnit::Hours)?;
    let dec = parse_angle("--dec", &args.dec, AngleUnit::Degrees)?;

    let mut options = SolverOptions::new();
    if let Some(z) = args.downsample {
        options.downsample(z);
    }
    if let Some(s) = args.max_stars {
        options.max_stars(s);
    }
    if let Some(t) = args.tolerance {
        options.tolerance(t);
    }
    if let Some(m) = args.min_star_size {
        options.min_star_size(m);
    }
    if args.check {
        options.check(true);
    }
    if let Some(ref database) = args.database {
        options.database(database);
    }
    if args.sip {
        options.sip(true);
    }
    if let Some(speed) = args.speed {
        options.speed(speed);
    }
    if args.update {
        options.update(true);
    }
    if args.annotate {
        options.annotate(true);
    }
    if args.solver_log {
        options.solver_log(true);
    }
    if let Some(sqm) = args.sqm {
        options.sqm(sqm);
    }

    let solver = Solver::new(&args.input)
        .executable(&args.exe)
        .radius(Angle::from_deg(args.radius))
        .fov(Angle::from_deg(args.fov))
        .ra(ra)
        .dec(dec)
        .options(options);

    info!("Solving: {:?}", args.input);
    let doc = solver.solve(args.stream, !args.keep)?;

    if doc.is_empty() {
        return Err(AppError::NoSolution {
            input: args.input.display().to_string(),
        }
        .into());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for entry in &doc {
            match entry {
                HeaderEntry::Card(card) => match &card.comment {
                    Some(comment) => println!(
                        "{:<8} = {:>20} / {}",
                        card.key,
                        format_value(&card.value),
                        comment
                    ),
                    None => println!("{:<8} = {:>20}", card.key, format_value(&card.value)),
                },
                HeaderEntry::Comment(text) => println!("COMMENT {}", text),
            }
        }
    }
    info!("Solved: {:?}", args.input);

    Ok(())
}
