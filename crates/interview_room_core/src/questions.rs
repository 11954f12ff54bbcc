//! crates/interview_room_core/src/questions.rs
//!
//! The two static evaluation question sets.

use crate::domain::{QuestionDefinition, Role};

/// Questions an interviewer answers about the candidate.
pub static INTERVIEWER_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        id: "edu-1",
        prompt_text: "How would you describe the candidate's educational background?",
        answer_choices: [
            "Has a strong educational foundation relevant to the job.",
            "Educational background is fairly related to the position.",
            "Education is somewhat related but lacks depth in key areas.",
            "Education does not match the requirements of the role.",
        ],
    },
    QuestionDefinition {
        id: "exp-1",
        prompt_text: "How relevant and valuable is the candidate's past work experience?",
        answer_choices: [
            "Highly relevant experience with clear achievements and growth.",
            "Has good experience that fits most of the job requirements.",
            "Limited relevant experience but shows potential to adapt.",
            "Experience is not related or sufficient for the role.",
        ],
    },
    QuestionDefinition {
        id: "tech-1",
        prompt_text: "How would you rate the candidate's technical skills?",
        answer_choices: [
            "Excellent technical knowledge and problem-solving ability.",
            "Good technical understanding with some minor gaps.",
            "Basic technical skills that need improvement.",
            "Lacks technical proficiency for the position.",
        ],
    },
    QuestionDefinition {
        id: "comm-1",
        prompt_text: "How well did the candidate communicate during the interview?",
        answer_choices: [
            "Communicated ideas clearly and confidently.",
            "Generally clear but sometimes needed clarification.",
            "Struggled to express thoughts effectively.",
            "Poor communication and unclear responses.",
        ],
    },
    QuestionDefinition {
        id: "int-1",
        prompt_text: "How interested and motivated did the candidate seem about the role?",
        answer_choices: [
            "Showed strong enthusiasm and clear motivation to join.",
            "Appeared interested but not deeply engaged.",
            "Showed limited enthusiasm or unclear career motivation.",
            "Seemed disinterested or unmotivated about the role.",
        ],
    },
    QuestionDefinition {
        id: "org-1",
        prompt_text: "How well did the candidate understand our company and the position?",
        answer_choices: [
            "Clearly researched our company and understood the role well.",
            "Had some basic knowledge of the company and role.",
            "Limited understanding of our organization.",
            "No preparation or awareness about the company.",
        ],
    },
    QuestionDefinition {
        id: "team-1",
        prompt_text: "How strong are the candidate's teamwork and interpersonal skills?",
        answer_choices: [
            "Excellent team player, communicates and collaborates naturally.",
            "Good teamwork skills but could be more assertive or flexible.",
            "Some difficulty collaborating or adjusting to team dynamics.",
            "Poor interpersonal or teamwork abilities.",
        ],
    },
    QuestionDefinition {
        id: "init-1",
        prompt_text: "How proactive or self-motivated is the candidate?",
        answer_choices: [
            "Very proactive and takes initiative naturally.",
            "Shows motivation with occasional guidance needed.",
            "Sometimes waits for direction or lacks drive.",
            "Shows little initiative or ownership.",
        ],
    },
    QuestionDefinition {
        id: "time-1",
        prompt_text: "How effective is the candidate at managing time and tasks?",
        answer_choices: [
            "Manages time and priorities efficiently.",
            "Generally organized but could improve planning.",
            "Sometimes loses focus or misses time balance.",
            "Poor time management and organization skills.",
        ],
    },
    QuestionDefinition {
        id: "cs-1",
        prompt_text: "If applicable, how well does the candidate handle customer or client situations?",
        answer_choices: [
            "Excellent customer focus, empathetic and solution-oriented.",
            "Good with customers but can improve communication tone.",
            "Basic customer understanding but lacks confidence.",
            "Struggles to handle customer interactions professionally.",
        ],
    },
    QuestionDefinition {
        id: "beh-1",
        prompt_text: "How would you describe the candidate's behavior and attitude during the interview?",
        answer_choices: [
            "Very positive, respectful, and confident attitude.",
            "Professional attitude with minor nervousness or hesitation.",
            "Neutral or inconsistent attitude at times.",
            "Unprofessional or negative behavior observed.",
        ],
    },
    QuestionDefinition {
        id: "prob-1",
        prompt_text: "How well did the candidate handle problem-solving or critical thinking tasks?",
        answer_choices: [
            "Strong analytical thinker, provided creative and logical solutions.",
            "Good reasoning skills with minor gaps in logic.",
            "Struggled with complex or situational questions.",
            "Unable to demonstrate problem-solving ability.",
        ],
    },
    QuestionDefinition {
        id: "fit-1",
        prompt_text: "How well do you think the candidate fits our team and culture?",
        answer_choices: [
            "Excellent cultural and team fit, would blend in well.",
            "Good fit with minor areas to adapt.",
            "Neutral fit, unsure how well they'd adjust.",
            "Not a good cultural or team fit.",
        ],
    },
    QuestionDefinition {
        id: "rec-1",
        prompt_text: "What is your overall recommendation for this candidate?",
        answer_choices: [
            "Strongly recommend for hire.",
            "Recommend with some reservations.",
            "Would consider for other roles or future opportunities.",
            "Do not recommend for this position.",
        ],
    },
];

/// Questions a candidate answers about the interview experience.
pub static CANDIDATE_QUESTIONS: &[QuestionDefinition] = &[
    QuestionDefinition {
        id: "clarity",
        prompt_text: "How clearly did the interviewer communicate and explain things?",
        answer_choices: [
            "Everything was explained very clearly and easy to follow.",
            "Mostly clear, with only a few moments of confusion.",
            "Sometimes hard to understand or not well explained.",
            "Frequently unclear or confusing.",
        ],
    },
    QuestionDefinition {
        id: "professionalism",
        prompt_text: "How would you describe the interviewer's professionalism and respect?",
        answer_choices: [
            "Very polite, respectful, and professional throughout.",
            "Generally professional and courteous.",
            "Occasionally seemed impatient or distracted.",
            "Unprofessional or disrespectful behavior noticed.",
        ],
    },
    QuestionDefinition {
        id: "knowledge",
        prompt_text: "Did the interviewer seem knowledgeable about the role and company?",
        answer_choices: [
            "Had a strong understanding of the role and company details.",
            "Knew most of the important points about the role.",
            "Seemed unsure about a few aspects of the position.",
            "Did not seem familiar with the role or company.",
        ],
    },
    QuestionDefinition {
        id: "interest",
        prompt_text: "Did the interviewer seem genuinely interested in what you shared?",
        answer_choices: [
            "Very engaged and interested in my answers.",
            "Listened most of the time with fair interest.",
            "Seemed distracted or only partially listening.",
            "Did not seem interested or responsive at all.",
        ],
    },
    QuestionDefinition {
        id: "behavior",
        prompt_text: "How would you describe the interviewer's behavior and attitude?",
        answer_choices: [
            "Very friendly, positive, and encouraging.",
            "Polite and neutral in behavior.",
            "A bit rushed or impatient at times.",
            "Rude or negative attitude noticed.",
        ],
    },
    QuestionDefinition {
        id: "structure",
        prompt_text: "Was the interview process organized and easy to follow?",
        answer_choices: [
            "Very well-organized with a smooth flow.",
            "Mostly organized but could be improved.",
            "A bit unstructured or confusing at times.",
            "Poorly planned and hard to follow.",
        ],
    },
    QuestionDefinition {
        id: "time",
        prompt_text: "Was the interview conducted within the expected time limit?",
        answer_choices: [
            "Perfectly timed, not too long or short.",
            "Slightly longer or shorter but fine overall.",
            "Felt rushed or went too long.",
            "Very poor time management.",
        ],
    },
    QuestionDefinition {
        id: "opportunity",
        prompt_text: "Did you get a chance to ask your own questions during the interview?",
        answer_choices: [
            "Yes, the interviewer encouraged my questions and answered clearly.",
            "Yes, but only briefly.",
            "Not much time was given for my questions.",
            "No opportunity to ask any questions.",
        ],
    },
    QuestionDefinition {
        id: "fairness",
        prompt_text: "Were the interview questions fair and related to the job?",
        answer_choices: [
            "All questions were fair and relevant to the role.",
            "Most questions were fair and related.",
            "Some questions felt unrelated or unclear.",
            "Many questions seemed unfair or irrelevant.",
        ],
    },
    QuestionDefinition {
        id: "communication",
        prompt_text: "How would you rate the interviewer's overall communication skills?",
        answer_choices: [
            "Excellent: clear, confident, and easy to talk to.",
            "Good: communicated well most of the time.",
            "Okay: a bit unclear at times.",
            "Poor: hard to communicate or understand.",
        ],
    },
    QuestionDefinition {
        id: "next-steps",
        prompt_text: "Did the interviewer clearly explain what happens after the interview?",
        answer_choices: [
            "Yes, next steps were explained clearly.",
            "Partly explained but not very detailed.",
            "Unclear about what happens next.",
            "No information given about next steps.",
        ],
    },
    QuestionDefinition {
        id: "overall",
        prompt_text: "How would you describe your overall interview experience?",
        answer_choices: [
            "Excellent: very positive and professional experience.",
            "Good: mostly positive, with a few small issues.",
            "Average: okay but could be better.",
            "Poor: not a good experience overall.",
        ],
    },
];

/// The question set a wizard runs, tagged by the role that answers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSet {
    Interviewer(&'static [QuestionDefinition]),
    Candidate(&'static [QuestionDefinition]),
}

impl QuestionSet {
    /// Interviewers get the evaluation set; everyone else gets the candidate set.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Interviewer => QuestionSet::Interviewer(INTERVIEWER_QUESTIONS),
            Role::Candidate | Role::Unspecified => QuestionSet::Candidate(CANDIDATE_QUESTIONS),
        }
    }

    pub fn questions(&self) -> &'static [QuestionDefinition] {
        match self {
            QuestionSet::Interviewer(q) | QuestionSet::Candidate(q) => q,
        }
    }

    /// The `userType` sent with submissions of this set.
    pub fn user_type(&self) -> Role {
        match self {
            QuestionSet::Interviewer(_) => Role::Interviewer,
            QuestionSet::Candidate(_) => Role::Candidate,
        }
    }

    pub fn find(&self, question_id: &str) -> Option<&'static QuestionDefinition> {
        self.questions().iter().find(|q| q.id == question_id)
    }
}
