// All oracle prompt templates for the scan pipeline.
// The JSON-only system prompt is shared and lives in llm_client::prompts.

/// Shared rule for what counts as a skill term.
const SKILL_TERM_RULES: &str = "\
SKILL TERMS:
- hard skills: named tools, technologies, languages, frameworks, or technical processes \
(e.g. \"SQL\", \"Power BI\", \"financial modelling\", \"CI/CD\")
- soft skills: named interpersonal or behavioural competencies \
(e.g. \"stakeholder management\", \"leadership\", \"negotiation\")
- use short canonical terms (1-4 words), one concept per entry
- NEVER return generic words (\"experience\", \"team\", \"work\", \"skills\", \"responsible\")
- NEVER return duplicates";

/// CV fact extraction. Replace `{skill_rules}` and `{cv_text}` before sending.
pub const CV_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract structured facts from the candidate CV below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "hardSkills": ["SQL", "Python"],
  "softSkills": ["stakeholder management"],
  "totalYearsExperience": 4.5,
  "highestEducationLevel": "Bachelors",
  "actionVerbCount": 7,
  "quantifiedResultCount": 3,
  "jobTimeline": [
    {"role": "Data Analyst", "company": "Acme Corp", "start": "2019-03", "end": "2023-06"}
  ]
}

Rules:

{skill_rules}

totalYearsExperience: total professional experience in years (number, may be fractional).
highestEducationLevel: exactly one of "None", "HighSchool", "Bachelors", "Masters", "PhD".
actionVerbCount: number of bullet points or sentences that open with a strong action verb
  ("Led", "Built", "Reduced", "Launched"...).
quantifiedResultCount: number of achievements stated with a concrete number, percentage,
  currency amount or multiplier.
jobTimeline: every role in the order it appears in the CV. "start"/"end" as written in the CV
  (prefer YYYY-MM); use null for "end" when the role is current.

CANDIDATE CV:
{cv_text}"#;

/// Job description fact extraction. Replace `{skill_rules}` and `{job_text}` before sending.
pub const JOB_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the hiring requirements from the job posting below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "requiredHardSkills": ["SQL", "Python", "AWS"],
  "requiredSoftSkills": ["communication"],
  "requiredYearsExperience": 3,
  "requiredEducationLevel": "Bachelors"
}

Rules:

{skill_rules}

requiredYearsExperience: minimum years asked for (number); 0 if not stated.
requiredEducationLevel: exactly one of "None", "HighSchool", "Bachelors", "Masters", "PhD";
  "None" if not stated.

JOB DESCRIPTION:
{job_text}"#;

/// Recruiter feedback. Replace `{overall_score}` and `{missing_skills}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an experienced recruiter reviewing an applicant-tracking report.

DETERMINISTIC SCORE: {overall_score}/100
TOP MISSING HARD SKILLS: {missing_skills}

Do NOT re-score the candidate. The score above is final; explain it.

Return a JSON object with this EXACT schema (no extra fields):
{
  "gutReaction": "One sentence: your honest first impression as a recruiter.",
  "summary": "Two to four sentences explaining the score and the most important gaps.",
  "suggestedQuestions": ["An interview question probing one of the gaps", "..."]
}

suggestedQuestions: 3 to 5 questions."#;

pub fn cv_extraction_prompt(cv_text: &str) -> String {
    CV_EXTRACTION_PROMPT_TEMPLATE
        .replace("{skill_rules}", SKILL_TERM_RULES)
        .replace("{cv_text}", cv_text)
}

pub fn job_extraction_prompt(job_text: &str) -> String {
    JOB_EXTRACTION_PROMPT_TEMPLATE
        .replace("{skill_rules}", SKILL_TERM_RULES)
        .replace("{job_text}", job_text)
}

pub fn feedback_prompt(overall_score: u32, missing_skills: &[String]) -> String {
    let missing = if missing_skills.is_empty() {
        "none".to_string()
    } else {
        missing_skills.join(", ")
    };
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{overall_score}", &overall_score.to_string())
        .replace("{missing_skills}", &missing)
}
