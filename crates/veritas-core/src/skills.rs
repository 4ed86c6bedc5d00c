//! Skill normalisation and matching.
//!
//! Shared by the JD skill matcher, the tech consistency report and the
//! GitHub agent so that "JS", "javascript" and "JavaScript" all compare equal.

use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap, HashSet};

lazy_static! {
    /// Alias -> canonical name
    static ref SYNONYMS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("js", "javascript");
        m.insert("ecmascript", "javascript");
        m.insert("ts", "typescript");
        m.insert("py", "python");
        m.insert("python3", "python");
        m.insert("golang", "go");
        m.insert("cpp", "c++");
        m.insert("csharp", "c#");
        m.insert("nodejs", "node");
        m.insert("node.js", "node");
        m.insert("react.js", "react");
        m.insert("reactjs", "react");
        m.insert("vue.js", "vue");
        m.insert("vuejs", "vue");
        m.insert("next.js", "next");
        m.insert("k8s", "kubernetes");
        m.insert("sklearn", "scikit-learn");
        m.insert("scikit learn", "scikit-learn");
        m.insert("tf", "tensorflow");
        m.insert("pt", "pytorch");
        m.insert("torch", "pytorch");
        m.insert("postgres", "postgresql");
        m.insert("psql", "postgresql");
        m.insert("mongo", "mongodb");
        m.insert("ml", "machine learning");
        m.insert("dl", "deep learning");
        m.insert("neural networks", "deep learning");
        m.insert("amazon web services", "aws");
        m.insert("google cloud", "gcp");
        m.insert("google cloud platform", "gcp");
        m.insert("microsoft azure", "azure");
        m.insert("jupyter notebook", "jupyter");
        m
    };

    /// Canonical requirement -> technologies that demonstrate it
    static ref IMPLIED_BY: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("python", &["django", "flask", "fastapi"]);
        m.insert("javascript", &["node", "react", "vue", "angular", "express", "typescript"]);
        m.insert("java", &["spring", "maven"]);
        m.insert("sql", &["mysql", "postgresql", "sqlite"]);
        m.insert("machine learning", &["deep learning"]);
        m
    };

    /// Skills no external source can corroborate.
    static ref SOFT_SKILLS: HashSet<&'static str> = [
        "communication",
        "communication skills",
        "leadership",
        "teamwork",
        "team player",
        "problem solving",
        "problem-solving",
        "critical thinking",
        "time management",
        "adaptability",
        "collaboration",
        "creativity",
        "attention to detail",
        "work ethic",
        "interpersonal skills",
        "presentation skills",
        "public speaking",
        "negotiation",
        "mentoring",
    ]
    .into_iter()
    .collect();
}

/// Lower-case, trim, collapse whitespace and resolve aliases.
pub fn normalize(skill: &str) -> String {
    let collapsed = skill
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match SYNONYMS.get(collapsed.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => collapsed,
    }
}

/// Case-insensitive exact-or-synonym match of a candidate against a requirement.
pub fn skills_match(required: &str, candidate: &str) -> bool {
    let required = normalize(required);
    let candidate = normalize(candidate);

    if required.is_empty() || candidate.is_empty() {
        return false;
    }

    if required == candidate {
        return true;
    }

    IMPLIED_BY
        .get(required.as_str())
        .map(|techs| techs.contains(&candidate.as_str()))
        .unwrap_or(false)
}

/// Whether a skill is a soft skill (non-verifiable by design).
pub fn is_soft_skill(skill: &str) -> bool {
    SOFT_SKILLS.contains(normalize(skill).as_str())
}

/// Normalise a list of skills into a sorted, de-duplicated set.
pub fn normalize_all<'a>(skills: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    skills
        .into_iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_resolves_aliases() {
        assert_eq!(normalize("  JS "), "javascript");
        assert_eq!(normalize("K8s"), "kubernetes");
        assert_eq!(normalize("Machine   Learning"), "machine learning");
        assert_eq!(normalize("Rust"), "rust");
    }

    #[test]
    fn test_exact_and_synonym_match() {
        assert!(skills_match("JavaScript", "js"));
        assert!(skills_match("PostgreSQL", "postgres"));
        assert!(skills_match("Python", "Django"));
        assert!(!skills_match("Django", "Python"));
        assert!(!skills_match("Java", "JavaScript"));
        assert!(!skills_match("", ""));
    }

    #[test]
    fn test_soft_skills() {
        assert!(is_soft_skill("Leadership"));
        assert!(is_soft_skill("Problem Solving"));
        assert!(!is_soft_skill("Rust"));
    }

    #[test]
    fn test_normalize_all_dedups() {
        let skills = vec!["JS".to_string(), "javascript".to_string(), " ".to_string()];
        let set = normalize_all(&skills);
        assert_eq!(set.len(), 1);
        assert!(set.contains("javascript"));
    }
}
