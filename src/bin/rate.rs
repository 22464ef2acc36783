use true_skill::{Rating, TrueSkill};

// Each team is a comma-separated list of mu:sig pairs, e.g. "27.1:5.2,25:8.3"
fn parse_team(arg: &str) -> Result<Vec<Rating>, String> {
    arg.split(',')
        .map(|member| -> Result<Rating, String> {
            let (mu, sig) = member
                .split_once(':')
                .ok_or_else(|| format!("{} is not of the form mu:sig", member))?;
            let mu = mu.trim().parse::<f64>().map_err(|e| format!("bad mu {}: {}", mu, e))?;
            let sig = sig.trim().parse::<f64>().map_err(|e| format!("bad sig {}: {}", sig, e))?;
            Ok(Rating::new(mu, sig))
        })
        .collect()
}

/// Rates one match given on the command line, teams listed from first place to last
fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        tracing::error!("Usage: {} team1 team2 [team3 ...]", args[0]);
        return;
    }

    let teams: Result<Vec<_>, _> = args[1..].iter().map(|arg| parse_team(arg)).collect();
    let teams = match teams {
        Ok(teams) => teams,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    let env = TrueSkill::default();
    match env.rate(&teams) {
        Ok(result) => {
            for (place, team) in result.iter().enumerate() {
                for rating in team {
                    println!(
                        "place {}: mu={:.3} sig={:.3} exposed={:.3}",
                        place + 1,
                        rating.mu,
                        rating.sig,
                        env.expose(rating)
                    );
                }
            }
        }
        Err(e) => tracing::error!("Failed to rate match: {}", e),
    }
}
