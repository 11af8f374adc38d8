//! User intents typed at the interactive prompt.

use marquee_core::error::CoreError;
use marquee_core::favorites::Rating;
use marquee_core::types::{parse_movie_id, MovieId};

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `search <title>`; the query may be blank, which the controller rejects.
    Search(String),
    Details(MovieId),
    Close,
    Favorite(MovieId),
    Unfavorite(MovieId),
    Rate(MovieId, Rating),
    /// `note <id> [text]`; no text clears the note.
    Note(MovieId, String),
    Favorites,
    Results,
    Help,
    Quit,
}

impl Command {
    /// Parse a prompt line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CoreError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "search" | "s" => Command::Search(rest.to_string()),
            "details" | "d" => Command::Details(parse_movie_id(rest)?),
            "close" => Command::Close,
            "fav" | "favorite" => Command::Favorite(parse_movie_id(rest)?),
            "unfav" | "unfavorite" | "rm" => Command::Unfavorite(parse_movie_id(rest)?),
            "rate" => {
                let (id, value) = split_id(rest)?;
                let value: u8 = value.parse().map_err(|_| {
                    CoreError::Validation(format!(
                        "Rating must be between {} and {}",
                        Rating::MIN,
                        Rating::MAX
                    ))
                })?;
                Command::Rate(id, Rating::new(value)?)
            }
            "note" => {
                let (id, text) = split_id(rest)?;
                Command::Note(id, text.to_string())
            }
            "favorites" | "favs" | "ls" => Command::Favorites,
            "results" => Command::Results,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(CoreError::Validation(format!(
                    "Unknown command '{other}'. Type 'help' for a list."
                )))
            }
        };
        Ok(Some(command))
    }
}

/// Split `"<id> <rest>"` into the parsed id and the remaining text.
fn split_id(input: &str) -> Result<(MovieId, &str), CoreError> {
    match input.split_once(char::is_whitespace) {
        Some((id, rest)) => Ok((parse_movie_id(id)?, rest.trim())),
        None => Ok((parse_movie_id(input)?, "")),
    }
}

/// Text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  search <title>      search movies by title            (alias: s)
  details <id>        open the detail overlay           (alias: d)
  close               close the detail overlay
  fav <id>            favorite a movie from the results
  unfav <id>          remove a favorite                 (alias: rm)
  rate <id> <1-5>     rate a favorite
  note <id> [text]    set or clear a favorite's note
  favorites           list favorites                    (alias: ls)
  results             show the last search results
  help                show this help
  quit                exit";

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_search_with_multiword_query() {
        assert_eq!(
            Command::parse("search  Harry Potter ").unwrap(),
            Some(Command::Search("Harry Potter".to_string()))
        );
        assert_eq!(
            Command::parse("s").unwrap(),
            Some(Command::Search(String::new()))
        );
    }

    #[test]
    fn blank_line_is_no_command() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn parses_favorite_commands() {
        assert_eq!(Command::parse("fav 27205").unwrap(), Some(Command::Favorite(27205)));
        assert_eq!(Command::parse("rm 27205").unwrap(), Some(Command::Unfavorite(27205)));
        assert_eq!(
            Command::parse("rate 27205 4").unwrap(),
            Some(Command::Rate(27205, Rating::new(4).unwrap()))
        );
        assert_eq!(
            Command::parse("note 27205 watch with subtitles").unwrap(),
            Some(Command::Note(27205, "watch with subtitles".to_string()))
        );
        assert_eq!(
            Command::parse("note 27205").unwrap(),
            Some(Command::Note(27205, String::new()))
        );
    }

    #[test]
    fn rejects_bad_ratings_and_ids() {
        assert_matches!(Command::parse("rate 1 9"), Err(CoreError::Validation(_)));
        assert_matches!(Command::parse("rate 1 five"), Err(CoreError::Validation(_)));
        assert_matches!(Command::parse("details abc"), Err(CoreError::Validation(_)));
        assert_matches!(Command::parse("details"), Err(CoreError::Validation(msg)) if msg == "Missing movie id.");
    }

    #[test]
    fn rejects_unknown_verbs() {
        assert_matches!(Command::parse("dance 1"), Err(CoreError::Validation(_)));
    }
}
