//! NBA franchise names and stats-site codes

use crate::error::DataError;
use crate::models::Team;

/// Full name and stats-site code of every current franchise
const TEAMS: &[(&str, &str)] = &[
    ("Atlanta Hawks", "ATL"),
    ("Boston Celtics", "BOS"),
    ("Brooklyn Nets", "BRK"),
    ("Charlotte Hornets", "CHO"),
    ("Chicago Bulls", "CHI"),
    ("Cleveland Cavaliers", "CLE"),
    ("Dallas Mavericks", "DAL"),
    ("Denver Nuggets", "DEN"),
    ("Detroit Pistons", "DET"),
    ("Golden State Warriors", "GSW"),
    ("Houston Rockets", "HOU"),
    ("Indiana Pacers", "IND"),
    ("Los Angeles Clippers", "LAC"),
    ("LA Clippers", "LAC"),
    ("Los Angeles Lakers", "LAL"),
    ("Memphis Grizzlies", "MEM"),
    ("Miami Heat", "MIA"),
    ("Milwaukee Bucks", "MIL"),
    ("Minnesota Timberwolves", "MIN"),
    ("New Orleans Pelicans", "NOP"),
    ("New York Knicks", "NYK"),
    ("Oklahoma City Thunder", "OKC"),
    ("Orlando Magic", "ORL"),
    ("Philadelphia 76ers", "PHI"),
    ("Phoenix Suns", "PHO"),
    ("Portland Trail Blazers", "POR"),
    ("Sacramento Kings", "SAC"),
    ("San Antonio Spurs", "SAS"),
    ("Toronto Raptors", "TOR"),
    ("Utah Jazz", "UTA"),
    ("Washington Wizards", "WAS"),
];

/// Former names still found on older schedule pages
const FORMER_TEAMS: &[(&str, &str)] = &[
    ("Charlotte Bobcats", "CHA"),
    ("New Orleans Hornets", "NOH"),
    ("New Orleans/Oklahoma City Hornets", "NOK"),
    ("New Jersey Nets", "NJN"),
    ("Seattle SuperSonics", "SEA"),
    ("Vancouver Grizzlies", "VAN"),
    ("Washington Bullets", "WSB"),
    ("Kansas City Kings", "KCK"),
    ("San Diego Clippers", "SDC"),
    ("Buffalo Braves", "BUF"),
    ("New Orleans Jazz", "NOJ"),
    ("New York Nets", "NYN"),
    ("San Diego Rockets", "SDR"),
    ("Kansas City-Omaha Kings", "KCO"),
    ("Capital Bullets", "CAP"),
    ("Baltimore Bullets", "BAL"),
];

/// Look up the stats-site code for a full team name (case-insensitive)
pub fn abbreviation(name: &str) -> Option<&'static str> {
    let name = name.trim();
    TEAMS
        .iter()
        .chain(FORMER_TEAMS)
        .find(|(full, _)| full.eq_ignore_ascii_case(name))
        .map(|(_, abbr)| *abbr)
}

/// Build a [`Team`] from its full name
pub fn team(name: &str) -> Result<Team, DataError> {
    let name = name.trim();
    let abbr = abbreviation(name).ok_or_else(|| DataError::UnknownTeam(name.to_string()))?;
    Ok(Team {
        name: name.to_string(),
        abbr: abbr.to_string(),
    })
}
