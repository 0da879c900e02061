use once_cell::sync::Lazy;
use regex::Regex;

/// One engine-reported line of analysis: the MultiPV slot, the score,
/// and the first move of the principal variation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoLine {
    pub multipv: usize,
    pub score: Score,
    pub head: String,
}

/// A raw engine score, relative to the side to move in the analysed
/// position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i32),
}

static INFO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^info\b.*\bscore (cp|mate) (-?\d+).*\bpv (\S+)").unwrap());
static MULTIPV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmultipv (\d+)\b").unwrap());

/// Parses an `info ... score ... pv ...` line. Lines without a score or
/// principal variation (currmove reports, depth-only updates) yield
/// None. The MultiPV slot defaults to 1 when the engine omits it.
pub fn parse_info(line: &str) -> Option<InfoLine> {
    let cap = INFO_RE.captures(line)?;

    let value: i32 = cap[2].parse().ok()?;
    let score = match &cap[1] {
        "cp" => Score::Centipawns(value),
        _ => Score::Mate(value),
    };

    let multipv = MULTIPV_RE
        .captures(line)
        .and_then(|cap| cap[1].parse().ok())
        .unwrap_or(1);

    Some(InfoLine {
        multipv,
        score,
        head: cap[3].to_string(),
    })
}

pub fn is_bestmove(line: &str) -> bool {
    line.starts_with("bestmove")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cp_line() {
        let line = "info depth 20 seldepth 28 multipv 2 score cp 34 nodes 1514323 \
                    nps 842154 time 1798 pv e2e4 e7e5 g1f3";
        let info = parse_info(line).unwrap();

        assert_eq!(info.multipv, 2);
        assert_eq!(info.score, Score::Centipawns(34));
        assert_eq!(info.head, "e2e4");
    }

    #[test]
    fn test_parse_negative_mate_line() {
        let line = "info depth 31 multipv 1 score mate -3 pv d8h4 g2g3 h4g3";
        let info = parse_info(line).unwrap();

        assert_eq!(info.score, Score::Mate(-3));
        assert_eq!(info.head, "d8h4");
    }

    #[test]
    fn test_parse_defaults_multipv_to_one() {
        let line = "info depth 12 score cp -15 pv g8f6";
        let info = parse_info(line).unwrap();

        assert_eq!(info.multipv, 1);
        assert_eq!(info.score, Score::Centipawns(-15));
    }

    #[test]
    fn test_parse_bound_annotation() {
        let line = "info depth 9 multipv 1 score cp 102 lowerbound nodes 12000 pv f3e5";
        let info = parse_info(line).unwrap();

        assert_eq!(info.score, Score::Centipawns(102));
        assert_eq!(info.head, "f3e5");
    }

    #[test]
    fn test_parse_skips_lines_without_pv() {
        assert!(parse_info("info depth 5 currmove e2e4 currmovenumber 1").is_none());
        assert!(parse_info("info string NNUE evaluation enabled").is_none());
    }

    #[test]
    fn test_bestmove_detection() {
        assert!(is_bestmove("bestmove e2e4 ponder e7e5"));
        assert!(!is_bestmove("info depth 1 score cp 0 pv e2e4"));
    }
}
