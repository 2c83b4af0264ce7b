//! Declarative per-field pattern data.
//!
//! Detectors read their section titles, keyword rules and exclusions from
//! here instead of carrying private keyword lists, so the data can be listed
//! and tested on its own.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::detect::normalize::{clean_list_item, normalize_line};

/// One keyword or regex alternative with its priority.
#[derive(Debug, Clone, Serialize)]
pub struct PatternRule {
    /// Short identifier, also used as display value by some detectors.
    pub name: &'static str,
    /// Case-insensitive pattern.
    #[serde(serialize_with = "serialize_regex")]
    pub pattern: Regex,
    /// Strength of the evidence; higher wins.
    pub weight: f32,
}

impl PatternRule {
    fn new(name: &'static str, pattern: &str, weight: f32) -> Self {
        Self {
            name,
            pattern: Regex::new(&format!("(?i){}", pattern)).unwrap(),
            weight,
        }
    }
}

/// A rule match inside some text.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'r, 't> {
    pub rule: &'r PatternRule,
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

/// Pattern data for one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldPatterns {
    pub field: &'static str,
    /// Canonical section titles, lower-case.
    pub headers: Vec<&'static str>,
    /// Ordered keyword/regex rules.
    pub rules: Vec<PatternRule>,
    /// Patterns that veto a candidate.
    #[serde(serialize_with = "serialize_regexes")]
    pub exclusions: Vec<Regex>,
}

impl FieldPatterns {
    fn new(field: &'static str) -> Self {
        Self {
            field,
            headers: Vec::new(),
            rules: Vec::new(),
            exclusions: Vec::new(),
        }
    }

    fn headers(mut self, headers: &[&'static str]) -> Self {
        self.headers.extend_from_slice(headers);
        self
    }

    fn rule(mut self, name: &'static str, pattern: &str, weight: f32) -> Self {
        self.rules.push(PatternRule::new(name, pattern, weight));
        self
    }

    fn exclude(mut self, pattern: &str) -> Self {
        self.exclusions
            .push(Regex::new(&format!("(?i){}", pattern)).unwrap());
        self
    }

    /// True if `line` is one of this field's section titles.
    pub fn is_header(&self, line: &str) -> bool {
        let key = header_key(line);
        !key.is_empty() && self.headers.iter().any(|h| *h == key)
    }

    /// All rule matches in `text`, in rule order.
    pub fn rule_matches<'r, 't>(&'r self, text: &'t str) -> Vec<RuleMatch<'r, 't>> {
        self.rules
            .iter()
            .flat_map(|rule| {
                rule.pattern.find_iter(text).map(move |m| RuleMatch {
                    rule,
                    start: m.start(),
                    end: m.end(),
                    text: m.as_str(),
                })
            })
            .collect()
    }

    /// Highest-weight rule that matches; ties go to the earlier rule.
    pub fn best_rule_match<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        let mut best: Option<RuleMatch<'r, 't>> = None;

        for rule in &self.rules {
            if let Some(m) = rule.pattern.find(text) {
                if best.is_none_or(|b| rule.weight > b.rule.weight) {
                    best = Some(RuleMatch {
                        rule,
                        start: m.start(),
                        end: m.end(),
                        text: m.as_str(),
                    });
                }
            }
        }

        best
    }

    /// First rule (in declaration order) that matches.
    pub fn first_rule_match<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.rules.iter().find_map(|rule| {
            rule.pattern.find(text).map(|m| RuleMatch {
                rule,
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            })
        })
    }

    /// Sum of weights over every match, each rule counted at most `cap` times.
    pub fn weighted_hits(&self, text: &str, cap: usize) -> f32 {
        self.rules
            .iter()
            .map(|rule| rule.pattern.find_iter(text).take(cap).count() as f32 * rule.weight)
            .sum()
    }

    pub fn is_excluded(&self, text: &str) -> bool {
        self.exclusions.iter().any(|re| re.is_match(text))
    }
}

/// Reduce a line to the form section titles are compared in.
///
/// Strips list numbering, a trailing colon or period, and a trailing
/// parenthetical such as `(SLOs)`.
pub fn header_key(line: &str) -> String {
    let mut key = normalize_line(&clean_list_item(line));

    if let Some(idx) = key.rfind(" (") {
        if key.ends_with(')') {
            key.truncate(idx);
        }
    }

    key.trim_end_matches([':', '.', ' ', '-', '*'])
        .trim_start_matches(['*', '#', ' '])
        .to_string()
}

/// Section titles that end a captured content span.
pub const SECTION_BOUNDARIES: &[&str] = &[
    "course description",
    "course overview",
    "course information",
    "course format",
    "course objectives",
    "course goals",
    "course outcomes",
    "course learning outcomes",
    "student learning outcomes",
    "student learning objectives",
    "learning outcomes",
    "learning objectives",
    "prerequisites",
    "required texts",
    "required text",
    "required textbook",
    "required textbooks",
    "textbook",
    "textbooks",
    "required materials",
    "course materials",
    "materials",
    "readings",
    "technology requirements",
    "instructional methods",
    "teaching methods",
    "assignments",
    "course assignments",
    "course requirements",
    "assessment",
    "assessments",
    "evaluation",
    "grading",
    "grading policy",
    "grading scale",
    "grades",
    "late work",
    "late work policy",
    "late policy",
    "attendance",
    "attendance policy",
    "participation",
    "exams",
    "final exam",
    "academic integrity",
    "academic honesty",
    "academic honesty policy",
    "accessibility",
    "accessibility services",
    "disability services",
    "accommodations",
    "student support services",
    "support services",
    "mental health",
    "title ix",
    "course schedule",
    "tentative schedule",
    "tentative course schedule",
    "weekly schedule",
    "schedule",
    "calendar",
    "important dates",
    "topics",
    "course outline",
    "course content",
    "office hours",
    "contact information",
    "instructor information",
    "communication",
    "communication policy",
    "course policies",
    "policies",
    "university policies",
    "expectations",
    "student responsibilities",
];

/// True if `line` looks like the start of a new section.
pub fn is_section_boundary(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    let key = header_key(trimmed);
    if SECTION_BOUNDARIES.contains(&key.as_str()) {
        return true;
    }

    if trimmed.len() <= 60 && trimmed.ends_with(':') {
        if SECTION_BOUNDARIES.iter().any(|b| key.starts_with(b)) {
            return true;
        }
    }

    is_caps_heading(trimmed)
}

/// Short all-caps line such as `COURSE SCHEDULE`.
pub fn is_caps_heading(line: &str) -> bool {
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    let words = line.split_whitespace().count();

    letters.len() >= 4
        && (1..=6).contains(&words)
        && letters.iter().all(|c| c.is_uppercase())
        && !line.trim_end().ends_with('.')
}

lazy_static! {
    pub static ref SLO_PATTERNS: FieldPatterns = FieldPatterns::new("slo").headers(&[
        "student learning outcomes",
        "student learning outcome",
        "student learning objectives",
        "learning outcomes",
        "learning objectives",
        "course objectives",
        "course learning outcomes",
        "course learning objectives",
        "course outcomes",
        "program and student learning outcomes",
        "slos",
    ]);

    pub static ref EMAIL_PATTERNS: FieldPatterns = FieldPatterns::new("email")
        .rule("heading", r"\b(?:e-?mail|contact)\b", 1.0)
        .rule("instructor", r"\b(?:instructor|professor|prof\.|lecturer)\b", 0.8)
        .exclude(r"^(?:help\s?desk|it\.?support|support|no-?reply|registrar|librar(?:y|ies)|accessibility|disability|titleix|counseling|writing\.?center|tutoring|admissions|webmaster|info|bookstore|police)@");

    pub static ref INSTRUCTOR_PATTERNS: FieldPatterns = FieldPatterns::new("instructor")
        .rule("associate professor", r"\bassociate\s+professor\b", 1.0)
        .rule("assistant professor", r"\bassistant\s+professor\b", 1.0)
        .rule("clinical professor", r"\bclinical\s+(?:assistant\s+|associate\s+)?professor\b", 1.0)
        .rule("adjunct professor", r"\badjunct\s+professor\b", 1.0)
        .rule("visiting professor", r"\bvisiting\s+(?:assistant\s+)?professor\b", 1.0)
        .rule("professor emeritus", r"\bprofessor\s+emerit(?:us|a)\b", 1.0)
        .rule("senior lecturer", r"\bsenior\s+lecturer\b", 0.95)
        .rule("principal lecturer", r"\bprincipal\s+lecturer\b", 0.95)
        .rule("lecturer", r"\blecturer\b", 0.9)
        .rule("adjunct instructor", r"\badjunct\s+(?:instructor|faculty)\b", 0.9)
        .rule("adjunct", r"\badjunct\b", 0.8)
        .rule("teaching assistant", r"\bteaching\s+assistant\b", 0.6)
        .exclude(r"\b(?:course|syllabus|office|hours|email|e-mail|phone|department|university|college|school|room|hall|tba|tbd|online|class|section|semester|fall|spring|summer|winter|monday|tuesday|wednesday|thursday|friday|credits?|description|information|policy|outcomes|program|welcome)\b");

    pub static ref OFFICE_PATTERNS: FieldPatterns = FieldPatterns::new("office_information")
        .headers(&["office hours", "student hours", "drop-in hours", "office hours and location"])
        .rule("tbd", r"\boffice\s+hours?\s*[:\-]?\s*(?:tbd|tba|to\s+be\s+(?:determined|announced))\b", 1.0)
        .rule("by appointment", r"\bby\s+appointment\b", 0.7)
        .exclude(r"\b(?:class(?:room)?|lecture|meets|lab\s+section|recitation)\b");

    pub static ref PHONE_PATTERNS: FieldPatterns = FieldPatterns::new("phone")
        .rule("Phone by appointment", r"\b(?:tele)?phone\s+(?:calls?|meetings?|appointments?)\s+(?:are\s+|will\s+be\s+|can\s+be\s+)?(?:available\s+|scheduled\s+)?by\s+appointment|\bschedule\s+a\s+(?:tele)?phone\s+(?:call|meeting|appointment)|\b(?:tele)?phone\s+appointments?\b", 3.0)
        .rule("Phone by request", r"\brequest\s+a\s+(?:tele)?phone\s+(?:call|meeting)|\b(?:tele)?phone\s+(?:calls?\s+)?(?:up)?on\s+request|\b(?:tele)?phone\s+(?:calls?\s+)?by\s+request", 2.0)
        .rule("Phone contact available", r"\b(?:tele)?phone\s+contact\b|\bavailable\s+(?:by|via|over\s+the)\s+(?:tele)?phone|\bcontact\s+me\s+(?:by|via)\s+(?:tele)?phone|\b(?:tele)?phone\s+(?:is|are)\s+(?:also\s+)?(?:available|an\s+option|acceptable|welcome)|\bcall\s+(?:me\s+)?(?:at\s+)?(?:my\s+)?office\s+(?:phone|number)", 1.0)
        .exclude(r"\b(?:hotline|crisis|lifeline|help\s?desk|tech(?:nical)?\s+support|it\s+support|counseling|police|emergency|fax)\b");

    pub static ref RESPONSE_TIME_PATTERNS: FieldPatterns = FieldPatterns::new("response_time")
        .rule("response time", r"\bresponse\s+time\b", 3.0)
        .rule("within", r"\bwithin\b", 2.0)
        .rule("digit unit", r"\b\d{1,2}\s*(?:-|to)?\s*\d{0,2}\s*(?:business\s+|working\s+|school\s+)?(?:hours?|hrs?|days?)\b", 2.0)
        .rule("business", r"\((?:[^)]*)\)|\bbusiness\b|\bweekdays?\b|\bworking\b", 1.0)
        .exclude(r"\b(?:hotline|crisis|help\s?desk|tech(?:nical)?\s+support|it\s+support|service\s+desk|24/7)\b")
        .exclude(r"\b(?:credit|semester|contact|clock)\s+hours?\b|\bhours?\s+(?:per|a|each)\s+week\b|\bper\s+week\b")
        .exclude(r"^\s*(?:e-?mail|phone|tel|contact|office)\s*:\s*\S+\s*$");

    pub static ref MODALITY_ONLINE: FieldPatterns = FieldPatterns::new("modality")
        .rule("online synchronous", r"\bonline\s+synchronous\b|\bsynchronous(?:ly)?\s+online\b", 1.0)
        .rule("online asynchronous", r"\bonline\s+asynchronous\b|\basynchronous(?:ly)?\b", 1.0)
        .rule("fully online", r"\bfully\s+online\b|\b100%\s+online\b|\bentirely\s+online\b|\bonline\s+(?:course|class|section|format)\b|\bdelivered\s+online\b|\btaught\s+online\b", 1.0)
        .rule("remote", r"\bdelivered\s+remotely\b|\bremote\s+(?:instruction|learning|delivery)\b|\bdistance\s+(?:learning|education)\b", 1.0)
        .rule("videoconference", r"\bvia\s+zoom\b|\bon\s+zoom\b|\bzoom\s+(?:meeting|session|link|class)s?\b|\bmicrosoft\s+teams\b|\bteams\s+meeting\b|\bwebex\b|\bgoogle\s+meet\b", 1.0)
        .rule("virtual", r"\bvirtual\s+(?:class(?:room)?|sessions?|meetings?)\b|\bweb-based\s+course\b", 1.0)
        .rule("lms", r"\bcanvas\b|\bmycourses\b|\bblackboard\b|\bmoodle\b|\bd2l\b|\bbrightspace\b|\blearning\s+management\s+system\b|\blms\b", 0.25);

    pub static ref MODALITY_HYBRID: FieldPatterns = FieldPatterns::new("modality")
        .rule("hybrid", r"\bhybrid\b", 1.0)
        .rule("hyflex", r"\bhy-?flex\b", 1.0)
        .rule("blended", r"\bblended\s+(?:course|learning|format|delivery)\b", 1.0)
        .rule("partially online", r"\bpartially\s+online\b|\bpart(?:ly)?\s+online\b", 1.0)
        .rule("combination", r"\bcombination\s+of\s+(?:in[\s-]person|face[\s-]to[\s-]face)\s+and\s+online\b|\bcombination\s+of\s+online\s+and\s+(?:in[\s-]person|face[\s-]to[\s-]face)\b", 1.0);

    pub static ref MODALITY_IN_PERSON: FieldPatterns = FieldPatterns::new("modality")
        .rule("in person", r"\bin[\s-]person\b", 1.0)
        .rule("face to face", r"\bface[\s-]to[\s-]face\b", 1.0)
        .rule("on campus", r"\bon[\s-]campus\b", 1.0)
        .rule("classroom", r"\bclassroom\b|\blecture\s+hall\b", 1.0)
        .rule("meets in", r"\bmeets\s+in\b|\bclass\s+meets\b|\bheld\s+in\s+(?:room|[a-z]+\s+hall)\b", 1.0)
        .rule("room", r"\b(?:room|rm\.?)\s*#?\s*\d{1,4}[a-z]?\b|\b[a-z]+\s+hall\s+\d{1,4}\b", 1.0)
        .exclude(r"\boccasional(?:ly)?\s+online\b|\bsome\s+(?:classes|sessions|meetings)\s+(?:may\s+be\s+|will\s+be\s+)?(?:held\s+)?online\b|\bmay\s+(?:be\s+)?move[d]?\s+(?:online|to\s+zoom)\b|\bin\s+(?:the\s+)?(?:case|event)\s+of\s+(?:bad\s+|inclement\s+)?weather\b|\bsnow\s+days?\b");

    pub static ref CLASS_LOCATION_PATTERNS: FieldPatterns = FieldPatterns::new("class_location")
        .headers(&["class location", "location", "classroom", "meeting location", "course location"])
        .exclude(r"\b(?:office|office\s+hours)\b");

    pub static ref CREDIT_HOURS_PATTERNS: FieldPatterns = FieldPatterns::new("credit_hours")
        .rule("labeled", r"\b(?:credits?|credit\s+hours?|units?|semester\s+hours?)\s*[:\-]\s*(\d{1,2}(?:\.\d)?)\b", 1.0)
        .rule("inline", r"\b(\d{1,2}(?:\.\d)?)\s*[\-\s]?\s*(?:credits?|cr\.?|semester\s+hours?|credit\s+hours?|units?)\b", 0.85)
        .exclude(r"\b(?:per|each|every|for\s+each|for\s+every)\s+(?:\d+\s+)?(?:credit|cr)\b|\bcredit\s+hour\s+(?:policy|definition)\b");

    pub static ref WORKLOAD_PATTERNS: FieldPatterns = FieldPatterns::new("workload")
        .rule("engaged time", r"\b(?:engaged|academic|student)\s+(?:time|work|learning)\b[^.]{0,120}\b(?:per|each|a|every)\s+(?:week|credit)", 1.0)
        .rule("outside class", r"\bhours?\s+(?:of\s+)?(?:work|study|studying|effort|preparation)\s+(?:outside|beyond)\s+(?:of\s+)?(?:class|the\s+classroom)", 0.95)
        .rule("expected to spend", r"\bexpected\s+to\s+(?:spend|devote|dedicate|work|invest)\b[^.]{0,80}\bhours?\b", 0.95)
        .rule("hours per week", r"\b\d+\s*(?:-|to)?\s*\d*\s*hours?\s+(?:per|a|each)\s+week\b[^.]{0,80}\b(?:outside|homework|study|course|work|reading|preparation)", 0.9)
        .rule("per credit", r"\bfor\s+each\s+(?:hour|credit)\b[^.]{0,80}\bhours?\b|\bper\s+credit\s+hour\b[^.]{0,60}\bhours?\b", 0.85)
        .rule("credit hour policy", r"\bcredit\s+hour\s+(?:policy|definition)\b", 0.7);

    pub static ref ASSIGNMENT_TYPES_PATTERNS: FieldPatterns = FieldPatterns::new("assignment_types_title")
        .rule("types", r"^(?:assignment|assessment)\s+(?:types|categories|components|requirements|structure|overview|descriptions?)$|^course\s+(?:components|requirements|structure)$", 1.0)
        .rule("types of", r"^types\s+of\s+(?:assignments|assessments|graded\s+work)$", 1.0)
        .rule("assignments", r"^(?:course\s+)?assignments(?:\s+and\s+(?:assessments|exams|projects|activities))?$", 0.9)
        .rule("graded work", r"^(?:graded\s+(?:work|assignments|components|activities)|major\s+assignments|coursework|course\s+work|assessments?|methods\s+of\s+assessment|assessment\s+methods)$", 0.8);

    pub static ref GRADING_PROCEDURES_PATTERNS: FieldPatterns = FieldPatterns::new("grading_procedures_title")
        .rule("grading", r"^(?:course\s+)?grading(?:\s+(?:policy|policies|procedures?|criteria|breakdown|system|information|and\s+evaluation|and\s+assessment))?$", 1.0)
        .rule("evaluation", r"^(?:evaluation|evaluation\s+and\s+grading|assessment\s+and\s+grading|methods?\s+of\s+evaluation|evaluation\s+methods)$", 0.9)
        .rule("grade", r"^(?:grades?|grade\s+(?:distribution|breakdown|calculation|determination|weights?|weighting|composition))$", 0.9)
        .rule("how graded", r"^how\s+(?:you\s+will\s+be|grades\s+(?:are|will\s+be)|your\s+grade\s+(?:is|will\s+be))\s+(?:graded|evaluated|determined|calculated|assessed)$", 0.85);

    pub static ref LATE_WORK_PATTERNS: FieldPatterns = FieldPatterns::new("late_work")
        .headers(&[
            "late work policy",
            "late work",
            "late and missing work",
            "late or missing work",
            "late assignments",
            "late assignment policy",
            "late submission policy",
            "late submissions",
            "late policy",
            "late penalty",
            "late penalties",
            "missed work",
            "missing work",
            "make-up work",
            "makeup work",
            "make-up policy",
            "makeup policy",
            "make-up exams",
            "deadlines",
            "due dates",
            "assignment deadlines",
            "deadlines and late work",
            "extensions",
            "extension policy",
        ])
        .rule("penalty", r"[^.\n]*\blate\s+(?:work|assignments?|submissions?|papers?|homework)\b[^.\n]*\b(?:penalt\w*|deduct\w*|points?|%|percent|not\s+(?:be\s+)?accepted|reduced|lose|loss)\b[^.\n]*[.\n]?", 1.0)
        .rule("per day", r"[^.\n]*\b(?:\d+%|\d+\s+percent|\d+\s+points?|a\s+(?:full\s+)?letter\s+grade)\b[^.\n]*\b(?:per|each|for\s+each)\s+day\b[^.\n]*[.\n]?", 0.9)
        .rule("not accepted", r"[^.\n]*\b(?:no\s+late\s+(?:work|assignments|submissions)|late\s+(?:work|assignments|submissions)\s+(?:will\s+)?not\s+be\s+accepted)\b[^.\n]*[.\n]?", 0.9);

    pub static ref ASSIGNMENT_DELIVERY_PATTERNS: FieldPatterns = FieldPatterns::new("assignment_delivery")
        .headers(&[
            "assignment submission",
            "submission of assignments",
            "submitting assignments",
            "submitting work",
            "how to submit",
            "submission policy",
            "submission guidelines",
            "submission instructions",
            "assignment delivery",
        ])
        .rule("MyCourses", r"\bmy\s?courses\b", 1.0)
        .rule("Canvas", r"\bcanvas\b", 1.0)
        .rule("Blackboard", r"\bblackboard\b", 1.0)
        .rule("Moodle", r"\bmoodle\b", 1.0)
        .rule("Brightspace", r"\bbrightspace\b|\bd2l\b", 1.0)
        .rule("MyOpenMath", r"\bmyopenmath\b", 1.0)
        .rule("Mastering", r"\bmastering\s?(?:physics|chemistry|biology|a&p|engineering)?\b", 0.9)
        .rule("MyLab", r"\bmylab\b|\bmymathlab\b", 1.0)
        .rule("WebAssign", r"\bwebassign\b", 1.0)
        .rule("ALEKS", r"\baleks\b", 1.0)
        .rule("Gradescope", r"\bgradescope\b", 1.0)
        .rule("Turnitin", r"\bturnitin\b", 0.9)
        .rule("Connect", r"\bmcgraw[\s-]?hill\s+connect\b|\bconnect\s+(?:platform|assignments?)\b", 0.9)
        .rule("MindTap", r"\bmindtap\b|\bcengage\b", 0.9)
        .rule("zyBooks", r"\bzybooks?\b", 1.0)
        .rule("GitHub", r"\bgithub(?:\s+classroom)?\b", 0.8)
        .rule("Google Classroom", r"\bgoogle\s+classroom\b", 1.0)
        .rule("In class", r"\b(?:collected|submitted|handed\s+in|turned\s+in|due)\s+in\s+class\b|\bhard\s+copy\b|\bpaper\s+copy\b", 0.8)
        .rule("Email", r"\bsubmit(?:ted)?\s+(?:\w+\s+){0,3}(?:via|by|through)\s+e-?mail\b", 0.7)
        .exclude(r"\bgrades?\s+(?:are\s+|will\s+be\s+)?(?:posted|available|viewable|recorded)\s+(?:on|in)\b")
        .exclude(r"\bcourse\s+materials?\s+(?:are\s+)?(?:on|in|available\s+(?:on|in))\b|\bsyllabus\s+(?:is\s+)?(?:posted\s+)?(?:on|in)\b|\bresources?\s+(?:are\s+)?(?:on|in)\b");

    pub static ref PREFERRED_CONTACT_PATTERNS: FieldPatterns = FieldPatterns::new("preferred_contact")
        .headers(&["preferred contact", "preferred method of contact", "preferred contact method"])
        .rule("Email", r"\be-?mail\b|@", 1.0)
        .rule("Phone", r"\b(?:tele)?phone\b|\bcall\s+me\b|\btext\s+me\b", 1.0)
        .rule("Video call", r"\bzoom\b|\bmicrosoft\s+teams\b|\bvideo\s+(?:call|chat|conference)\b", 1.0)
        .rule("Office hours", r"\boffice\s+hours\b|\bin\s+person\b|\bstop\s+by\b", 1.0)
        .rule("LMS message", r"\b(?:canvas|mycourses|blackboard|moodle)\s+(?:inbox|messages?|messaging|mail)\b", 1.0)
        .exclude(r"\b(?:hotline|crisis|help\s?desk|tech(?:nical)?\s+support)\b");

    pub static ref GRADING_PROCESS_PATTERNS: FieldPatterns = FieldPatterns::new("grading_process")
        .headers(&[
            "grading",
            "grading policy",
            "grade breakdown",
            "grade distribution",
            "course grade",
            "evaluation",
            "assessment",
            "grading criteria",
            "final grade calculation",
        ])
        .exclude(r"^\s*[A-F][+\-]?\s*[:=\-–]");
}

/// All field pattern sets, for listing and review.
pub fn library() -> Vec<&'static FieldPatterns> {
    vec![
        &*SLO_PATTERNS,
        &*EMAIL_PATTERNS,
        &*INSTRUCTOR_PATTERNS,
        &*OFFICE_PATTERNS,
        &*PHONE_PATTERNS,
        &*RESPONSE_TIME_PATTERNS,
        &*MODALITY_ONLINE,
        &*MODALITY_HYBRID,
        &*MODALITY_IN_PERSON,
        &*CLASS_LOCATION_PATTERNS,
        &*CREDIT_HOURS_PATTERNS,
        &*WORKLOAD_PATTERNS,
        &*ASSIGNMENT_TYPES_PATTERNS,
        &*GRADING_PROCEDURES_PATTERNS,
        &*LATE_WORK_PATTERNS,
        &*ASSIGNMENT_DELIVERY_PATTERNS,
        &*PREFERRED_CONTACT_PATTERNS,
        &*GRADING_PROCESS_PATTERNS,
    ]
}

/// Pattern sets registered for a field name.
pub fn patterns_for(field: &str) -> Vec<&'static FieldPatterns> {
    library().into_iter().filter(|p| p.field == field).collect()
}

fn serialize_regex<S: serde::Serializer>(re: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(re.as_str())
}

fn serialize_regexes<S: serde::Serializer>(res: &[Regex], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(res.iter().map(|re| re.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_key() {
        assert_eq!(header_key("Student Learning Outcomes:"), "student learning outcomes");
        assert_eq!(header_key("  3. LEARNING OBJECTIVES  "), "learning objectives");
        assert_eq!(header_key("Course Objectives (SLOs)"), "course objectives");
        assert_eq!(header_key("• Late Work Policy -"), "late work policy");
    }

    #[test]
    fn test_slo_headers_reject_casual_mentions() {
        assert!(SLO_PATTERNS.is_header("Student Learning Outcomes:"));
        assert!(SLO_PATTERNS.is_header("LEARNING OBJECTIVES"));
        assert!(!SLO_PATTERNS.is_header("SLOs are important for course design."));
        assert!(!SLO_PATTERNS.is_header("Learning outcomes are assessed through exams"));
    }

    #[test]
    fn test_best_rule_prefers_weight() {
        let text = "you may request a phone call or schedule a phone call";
        let m = PHONE_PATTERNS.best_rule_match(text).unwrap();
        assert_eq!(m.rule.name, "Phone by appointment");
    }

    #[test]
    fn test_section_boundary() {
        assert!(is_section_boundary("Grading Policy"));
        assert!(is_section_boundary("Course Schedule:"));
        assert!(is_section_boundary("ACADEMIC INTEGRITY"));
        assert!(!is_section_boundary("Analyze data using statistical methods."));
        assert!(!is_section_boundary(""));
    }

    #[test]
    fn test_weighted_hits_caps_repeats() {
        let text = "canvas canvas canvas canvas canvas";
        assert_eq!(MODALITY_ONLINE.weighted_hits(text, 3), 0.75);
    }

    #[test]
    fn test_library_is_complete() {
        let fields: Vec<&str> = library().iter().map(|p| p.field).collect();
        for field in ["slo", "phone", "modality", "late_work", "assignment_delivery"] {
            assert!(fields.contains(&field), "missing {}", field);
        }
        assert_eq!(patterns_for("modality").len(), 3);
    }

    #[test]
    fn test_library_serializes() {
        let json = serde_json::to_value(&*PHONE_PATTERNS).unwrap();
        assert_eq!(json["field"], "phone");
        assert_eq!(json["rules"][0]["name"], "Phone by appointment");
    }
}
