use std::collections::HashMap;
use std::io::{self, Write};

use bracket_engine_core::standings::Standings;
use bracket_engine_core::{
    BracketSection, EntrantSpot, Link, Match, MatchGraph, MatchStatus, ParticipantId,
};

/// Writes one line per match. Links are printed as `target/spot`.
pub fn write_matches<W>(
    writer: &mut W,
    graph: &MatchGraph,
    names: &HashMap<ParticipantId, &str>,
) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        writer,
        "ID | Section | Round | Participant 1 | Participant 2 | Status | Next | Loser next"
    )?;

    for r#match in graph {
        writeln!(
            writer,
            "{} | {} | {} | {} | {} | {} | {} | {}",
            r#match.id,
            section(r#match.section),
            r#match.round,
            spot(r#match.entrants[0], names),
            spot(r#match.entrants[1], names),
            status(r#match),
            link(r#match.next),
            link(r#match.loser_next),
        )?;
    }

    Ok(())
}

pub fn write_standings<W>(writer: &mut W, standings: &Standings) -> io::Result<()>
where
    W: Write,
{
    writeln!(writer, "{}", standings.keys().collect::<Vec<_>>().join(" | "))?;

    for entry in standings.iter() {
        let values: Vec<String> = entry.values.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", values.join(" | "))?;
    }

    Ok(())
}

fn section(section: BracketSection) -> &'static str {
    match section {
        BracketSection::None => "-",
        BracketSection::Winners => "winners",
        BracketSection::Losers => "losers",
        BracketSection::GrandFinal => "grand final",
    }
}

fn spot(spot: EntrantSpot<ParticipantId>, names: &HashMap<ParticipantId, &str>) -> String {
    match spot {
        EntrantSpot::Entrant(id) => match names.get(&id) {
            Some(name) => (*name).to_owned(),
            None => id.to_string(),
        },
        EntrantSpot::Empty => String::from("-"),
        EntrantSpot::TBD => String::from("TBD"),
    }
}

fn status(r#match: &Match) -> &'static str {
    if r#match.is_bye() {
        return "bye";
    }

    if r#match.is_walkover() {
        return "walkover";
    }

    match r#match.status {
        MatchStatus::Pending => "pending",
        MatchStatus::Completed => "completed",
        MatchStatus::Cancelled => "cancelled",
    }
}

fn link(link: Option<Link>) -> String {
    match link {
        Some(link) => format!("{}/{}", link.target, link.spot),
        None => String::from("-"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bracket_engine_core::options::TournamentOptionValues;
    use bracket_engine_core::{
        generate, Format, Participant, ParticipantId, Tournament, TournamentId,
    };

    use super::{write_matches, write_standings};

    fn participants() -> Vec<Participant> {
        vec![
            Participant::new(1u64, "Alpha", 1),
            Participant::new(2u64, "Beta", 2),
            Participant::new(3u64, "Gamma", 3),
        ]
    }

    #[test]
    fn test_write_matches() {
        let graph = generate(
            TournamentId(1),
            Format::SingleElimination,
            participants(),
            TournamentOptionValues::new(),
        )
        .unwrap();

        let mut names = HashMap::new();
        names.insert(ParticipantId(1), "Alpha");
        names.insert(ParticipantId(2), "Beta");

        let mut buf = Vec::new();
        write_matches(&mut buf, &graph, &names).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "ID | Section | Round | Participant 1 | Participant 2 | Status | Next | Loser next\n\
             0 | winners | 1 | Alpha | - | bye | 2/0 | -\n\
             1 | winners | 1 | Beta | 3 | pending | 2/1 | -\n\
             2 | winners | 2 | Alpha | TBD | pending | - | -\n"
        );
    }

    #[test]
    fn test_write_standings() {
        let tournament = Tournament::new(
            TournamentId(1),
            Format::RoundRobin,
            participants(),
            TournamentOptionValues::new(),
        )
        .unwrap();

        let mut buf = Vec::new();
        write_standings(&mut buf, &tournament.initial_standings().unwrap()).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "seed | name | matches | byes\n\
             1 | Alpha | 2 | 1\n\
             2 | Beta | 2 | 1\n\
             3 | Gamma | 2 | 1\n"
        );
    }
}
