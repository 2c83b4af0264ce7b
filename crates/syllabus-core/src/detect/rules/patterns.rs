//! Common regex patterns for syllabus field detection.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Contact details
    pub static ref EMAIL: Regex = Regex::new(
        r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}"
    ).unwrap();

    pub static ref EMAIL_CONTEXT: Regex = Regex::new(
        r"(?i)\b(?:e-?mail|contact|instructor|professor|prof\.|lecturer|faculty)\b"
    ).unwrap();

    pub static ref SERVICE_MAILBOX: Regex = Regex::new(
        r"(?i)^(?:help\s?desk|helpdesk|it\.?support|support|no-?reply|registrar|library|libraries|accessibility|disability|access|titleix|title\.ix|counseling|writing\.?center|tutoring|admissions|webmaster|info|bookstore|police|security)@"
    ).unwrap();

    /// North American number: optional country code, area code, exchange, line.
    pub static ref PHONE_NUMBER_10: Regex = Regex::new(
        r"(?:\+?1[\s.\-]?)?(?:\(\d{3}\)\s*|\d{3}[\s.\-])\d{3}[\s.\-]\d{4}\b"
    ).unwrap();

    pub static ref PHONE_NUMBER_7: Regex = Regex::new(
        r"\b\d{3}[.\-]\d{4}\b"
    ).unwrap();

    pub static ref PHONE_LABEL: Regex = Regex::new(
        r"(?i)\b(?:phone|telephone|tel|cell|mobile|office\s+line)\b\.?\s*(?:number|no\.?|#)?\s*[:\-]?"
    ).unwrap();

    pub static ref PHONE_CONTACT_CONTEXT: Regex = Regex::new(
        r"(?i)\b(?:office|instructor|professor|contact|call|reach|text)\b"
    ).unwrap();

    pub static ref SUPPORT_LINE: Regex = Regex::new(
        r"(?i)\b(?:hotline|crisis|lifeline|suicide|help\s?desk|it\s+support|tech(?:nical)?\s+support|service\s+desk|counseling|police|emergency|campus\s+safety|fax|toll[\s\-]free|disability\s+services|student\s+accessibility|title\s+ix)\b"
    ).unwrap();

    pub static ref PHONE_MENTION: Regex = Regex::new(
        r"(?i)\b(?:tele)?phone\b"
    ).unwrap();

    pub static ref CONTACT_INTENT: Regex = Regex::new(
        r"(?i)\b(?:call|calls|reach|reached|available|contact|leave\s+a\s+message|voicemail)\b"
    ).unwrap();

    pub static ref DEVICE_POLICY: Regex = Regex::new(
        r"(?i)\b(?:cell|mobile|smart)\s*-?\s*phones?\b|\bphones?\s+(?:must|should)\s+be\s+(?:silenced|turned\s+off|put\s+away|off)|\b(?:silence|turn\s+off|put\s+away)\s+(?:your\s+)?(?:tele)?phones?"
    ).unwrap();

    // Locations
    pub static ref ROOM: Regex = Regex::new(
        r"(?i)\b(?:room|rm\.?)\s*#?\s*([A-Z]?\d{1,4}[A-Z]?)\b"
    ).unwrap();

    pub static ref BUILDING_ROOM: Regex = Regex::new(
        r"\b((?:[A-Z][A-Za-z'\-]+\s+){1,3}(?:Hall|Building|Bldg\.?|Center|Centre|Library|Annex|Complex|Lab|Laboratory|Tower|Pavilion))\s*,?\s*(?:(?:[Rr]oom|[Rr]m\.?|#|[Ss]uite)\s*)?([A-Z]?\d{1,4}[A-Z]?)\b"
    ).unwrap();

    pub static ref BUILDING_CODE_ROOM: Regex = Regex::new(
        r"\b([A-Z]{2,5})\s*[\- ]?\s*(\d{3,4}[A-Z]?)\b"
    ).unwrap();

    pub static ref OFFICE_CONTEXT: Regex = Regex::new(
        r"(?i)\boffice\b"
    ).unwrap();

    pub static ref CLASS_CONTEXT: Regex = Regex::new(
        r"(?i)\b(?:class(?:room)?|lecture|lectures|meets|meeting\s+(?:time|place|location)|lab|section|location|held\s+in|course\s+meets|recitation|seminar)\b"
    ).unwrap();

    pub static ref LOCATION_LABEL: Regex = Regex::new(
        r"(?i)^\s*(?:class\s+|course\s+|lecture\s+|meeting\s+)?(?:location|classroom|room|place|where)\s*[:\-]\s*(.+?)\s*$"
    ).unwrap();

    pub static ref YEAR: Regex = Regex::new(
        r"^(?:19|20)\d{2}$"
    ).unwrap();

    // Time and schedule
    pub static ref MEETING_TIME: Regex = Regex::new(
        r"(?i)\b(?:mon(?:day)?s?|tue(?:s|sday)?s?|wed(?:nesday)?s?|thu(?:r|rs|rsday)?s?|fri(?:day)?s?|sat(?:urday)?s?|mwf|mw|tth|tr|m/w|t/th|m/w/f)\b[^.\n]{0,40}?\b\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)?\s*(?:-|–|to)\s*\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)?"
    ).unwrap();

    pub static ref DAY_NAME: Regex = Regex::new(
        r"(?i)\b(?:mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)(?:day|nesday|sday|rsday|urday)?s?\b"
    ).unwrap();

    pub static ref CLOCK_TIME: Regex = Regex::new(
        r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.|noon)"
    ).unwrap();

    // Grades
    pub static ref LETTER_GRADE_PAIR: Regex = Regex::new(
        r"\b([A-F][+\-]?)(?:\s*[:=|\-–]\s*|\s+)\(?\s*(\d{1,3}(?:\.\d+)?)\s*%?"
    ).unwrap();

    pub static ref RANGE_LETTER_PAIR: Regex = Regex::new(
        r"(\d{1,3}(?:\.\d+)?)\s*%?\s*(?:-|–|to)\s*\d{1,3}(?:\.\d+)?\s*%?\s*[:=|\-–]?\s*([A-F][+\-]?)(?:\s|$|,|;)"
    ).unwrap();

    pub static ref PERCENT_RANGE: Regex = Regex::new(
        r"\d{1,3}(?:\.\d+)?\s*%?\s*(?:-|–|to)\s*\d{1,3}(?:\.\d+)?\s*%|\d{1,3}(?:\.\d+)?\s*%\s*(?:and\s+(?:above|up)|or\s+(?:above|higher|more)|\+)"
    ).unwrap();

    pub static ref WEIGHTED_COMPONENT: Regex = Regex::new(
        r"(?i)\b(?:exams?|midterms?|finals?|quiz(?:zes)?|homework|assignments?|projects?|participation|attendance|labs?|papers?|essays?|presentations?|discussions?|reflections?|portfolio|problem\s+sets?)\b[^\n]{0,60}?\b\d{1,3}(?:\.\d+)?\s*(?:%|percent|points|pts)"
    ).unwrap();

    pub static ref GRADE_SCALE_HEADING: Regex = Regex::new(
        r"(?i)\b(?:grad(?:e|ing)\s+scale|letter\s+grades?|final\s+grades?|grade\s+(?:distribution|conversion|equivalents?)|grading\s+(?:system|criteria)|course\s+grades?)\b"
    ).unwrap();

    // Durations that are not response times
    pub static ref DURATION_TERM: Regex = Regex::new(
        r"(?i)\b(?:credit|semester|contact|clock|lab|studio|lecture|class|instructional)\s+hours?\b|\bhours?\s+(?:per|a|each)\s+week\b|\bper\s+week\b|\bhours?\s+of\s+(?:work|study|reading|instruction)\b|\b(?:runs?|lasts?|lasting)\s+(?:for\s+)?(?:about\s+|approximately\s+)?(?:\d|one|two|three)"
    ).unwrap();

    pub static ref DEADLINE_TERM: Regex = Regex::new(
        r"(?i)\b(?:due|deadlines?|submit(?:ted)?|submissions?|late|exams?|quiz(?:zes)?|assignments?|graded?|grades|returned)\b"
    ).unwrap();

    pub static ref REPLY_VERB: Regex = Regex::new(
        r"(?i)\b(?:respond|responds|response|reply|replies|answer|get\s+back\s+to)\b|\be-?mails?\b"
    ).unwrap();

    pub static ref SENTENCE_BREAK: Regex = Regex::new(
        r"[.!?](?:\s+|$)|\n\s*\n"
    ).unwrap();
}

/// Count the digits in a string.
pub fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Split text into sentences, returning byte ranges into `text`.
pub fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        let end = m.start() + 1;
        if text[start..end].trim().len() > 1 {
            spans.push((start, end.min(text.len())));
        }
        start = m.end();
    }

    if start < text.len() && !text[start..].trim().is_empty() {
        spans.push((start, text.len()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        let m = EMAIL.find("Contact: jane.smith@unh.edu.").unwrap();
        assert_eq!(m.as_str(), "jane.smith@unh.edu");
    }

    #[test]
    fn test_phone_patterns() {
        assert_eq!(
            PHONE_NUMBER_10.find("Phone: (603) 555-1234").unwrap().as_str(),
            "(603) 555-1234"
        );
        assert_eq!(
            PHONE_NUMBER_10.find("call +1 603.555.1234 today").unwrap().as_str(),
            "+1 603.555.1234"
        );
        assert!(PHONE_NUMBER_7.is_match("ext 862-3456"));
    }

    #[test]
    fn test_room_patterns() {
        let caps = BUILDING_ROOM.captures("Kingsbury Hall Room 130").unwrap();
        assert_eq!(&caps[1], "Kingsbury Hall");
        assert_eq!(&caps[2], "130");
        assert_eq!(&ROOM.captures("meets in Rm. 204B")
            .unwrap()[1], "204B");
    }

    #[test]
    fn test_meeting_time() {
        assert!(MEETING_TIME.is_match("Tuesdays and Thursdays 9:40 - 11:00 am"));
        assert!(MEETING_TIME.is_match("MWF 10:10-11:00"));
        assert!(!MEETING_TIME.is_match("Due Monday at midnight"));
    }

    #[test]
    fn test_sentence_spans() {
        let text = "First sentence. Second one! Third";
        let spans: Vec<&str> = sentence_spans(text)
            .into_iter()
            .map(|(s, e)| text[s..e].trim())
            .collect();
        assert_eq!(spans, vec!["First sentence.", "Second one!", "Third"]);
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count("(603) 555-1234"), 10);
    }
}
