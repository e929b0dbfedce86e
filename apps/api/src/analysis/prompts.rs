//! Prompt construction for resume analysis.
//!
//! The template embeds the exact JSON schema the normalizer and the store
//! agree on. Changing a key here without changing `normalize.rs` and the
//! record models is a contract break.

/// Analysis prompt template. Replace `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume text and extract structured information. Return a valid JSON object with the following structure:

{
  "personal_details": {
    "name": "Full Name or null",
    "email": "email@example.com or null",
    "phone": "phone number or null",
    "linkedin": "LinkedIn URL or null",
    "portfolio": "Portfolio URL or null",
    "location": "City, State/Country or null"
  },
  "resume_content": {
    "summary": "Professional summary or objective, or null",
    "work_experience": [
      {
        "company": "Company Name",
        "position": "Job Title",
        "duration": "Start Date - End Date",
        "responsibilities": ["responsibility 1", "responsibility 2"]
      }
    ],
    "education": [
      {
        "degree": "Degree Name",
        "institution": "University/School Name",
        "year": "Graduation Year",
        "gpa": "GPA if available"
      }
    ],
    "projects": [
      {
        "name": "Project Name",
        "description": "Project description",
        "technologies": ["tech1", "tech2"]
      }
    ],
    "certifications": [
      {
        "name": "Certification Name",
        "issuer": "Issuing Organization",
        "date": "Date obtained"
      }
    ]
  },
  "skills": {
    "technical_skills": ["skill1", "skill2"],
    "soft_skills": ["skill1", "skill2"]
  },
  "ai_feedback": {
    "rating": 8,
    "rating_explanation": "Explanation of the rating",
    "improvement_areas": ["Specific area for improvement"],
    "suggested_skills": ["Skill to learn for career advancement"],
    "strengths": ["Notable strength"]
  }
}

Every field shown above MUST be present in your output. Use null for scalar
fields with no information. Every array field MUST be emitted as an array,
even when empty — never omit it and never use null in place of an array.

Resume Text:
{resume_text}

Analyze this resume thoroughly and provide detailed, constructive feedback. Focus on:
1. Extracting accurate personal and professional information
2. Identifying both technical and soft skills
3. Providing a fair rating (1-10) based on resume quality, content, and presentation
4. Suggesting specific areas for improvement
5. Recommending relevant skills for career growth
6. Highlighting key strengths

Return only the JSON object, no additional text and no markdown code fences."#;

/// Renders the analysis prompt for one resume. Deterministic; the extracted
/// text is inserted verbatim and is not re-validated here.
pub fn build_analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
