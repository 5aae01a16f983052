//! Per-competency strategy and resource tables for development steps.
//!
//! Competencies without a specific entry get generic suggestions naming the competency.

use crate::models::roadmap::{Resource, ResourceKind};
use crate::profile::taxonomy;

type ResourceSpec = (&'static str, ResourceKind, Option<&'static str>);

struct Plan {
    strategies: &'static [&'static str],
    resources: &'static [ResourceSpec],
}

fn plan_for(competency_id: &str) -> Option<Plan> {
    use ResourceKind::*;
    let plan = match competency_id {
        "mathematical_reasoning" => Plan {
            strategies: &[
                "Work through one set of problems each day and check every solution",
                "Explain a solved problem aloud to a classmate to test understanding",
                "Join a math circle or competition training group",
            ],
            resources: &[
                ("Khan Academy mathematics", Course, Some("https://www.khanacademy.org/math")),
                ("Art of Problem Solving community", Community, Some("https://artofproblemsolving.com")),
            ],
        },
        "scientific_inquiry" => Plan {
            strategies: &[
                "Design and run a small experiment and write up the results",
                "Keep a lab notebook of questions, hypotheses and observations",
                "Enter a local science fair",
            ],
            resources: &[
                ("Crash Course science series", Course, Some("https://thecrashcourse.com")),
                ("Citizen science projects on Zooniverse", Practice, Some("https://www.zooniverse.org")),
            ],
        },
        "critical_thinking" => Plan {
            strategies: &[
                "Compare two articles on the same topic and list where they disagree",
                "Practise identifying assumptions in arguments you read",
                "Join a debate club",
            ],
            resources: &[
                ("Introductory logic course", Course, None),
                ("School debate society", Community, None),
            ],
        },
        "programming" => Plan {
            strategies: &[
                "Build a small project from start to finish in one language",
                "Solve a short coding exercise several times a week",
                "Read and review code written by others",
            ],
            resources: &[
                ("CS50 Introduction to Computer Science", Course, Some("https://cs50.harvard.edu")),
                ("Exercism practice tracks", Practice, Some("https://exercism.org")),
                ("Local coding club or hackathon", Community, None),
            ],
        },
        "data_analysis" => Plan {
            strategies: &[
                "Collect a small dataset about a topic you care about and chart it",
                "Learn spreadsheet formulas and pivot tables",
                "Summarise the findings of an analysis in one paragraph",
            ],
            resources: &[
                ("Kaggle Learn", Course, Some("https://www.kaggle.com/learn")),
                ("Open government datasets", Practice, Some("https://data.gov")),
            ],
        },
        "teamwork" => Plan {
            strategies: &[
                "Volunteer for group projects and agree roles at the start",
                "Ask teammates for feedback after each project",
                "Join a team sport or ensemble",
            ],
            resources: &[
                ("School clubs and societies", Community, None),
                ("Peer mentoring programme", Mentorship, None),
            ],
        },
        "empathy" => Plan {
            strategies: &[
                "Practise active listening by summarising what others say before replying",
                "Volunteer with a community service organisation",
                "Read fiction told from unfamiliar perspectives",
            ],
            resources: &[
                ("Community volunteering programme", Community, None),
                ("Conversations with a school counsellor", Mentorship, None),
            ],
        },
        "leadership" => Plan {
            strategies: &[
                "Take responsibility for organising one event or club activity",
                "Shadow a student leader or teacher for a term",
                "Reflect after each meeting on what went well and what to change",
            ],
            resources: &[
                ("Student council or club committee", Community, None),
                ("Leadership mentor", Mentorship, None),
            ],
        },
        "public_speaking" => Plan {
            strategies: &[
                "Present in class whenever the opportunity comes up",
                "Record a short talk and review it for pace and clarity",
                "Join a speaking or drama group",
            ],
            resources: &[
                ("Toastmasters Youth Leadership programme", Community, Some("https://www.toastmasters.org")),
                ("Recorded practice talks", Practice, None),
            ],
        },
        "written_communication" => Plan {
            strategies: &[
                "Write a short piece every week and revise it once",
                "Ask a teacher for feedback on structure and clarity",
                "Contribute to the school newsletter or a blog",
            ],
            resources: &[
                ("On Writing Well by William Zinsser", Book, None),
                ("School newspaper", Community, None),
            ],
        },
        "design_thinking" => Plan {
            strategies: &[
                "Interview three people about a problem before proposing a fix",
                "Sketch several solutions before choosing one",
                "Build a rough prototype and test it with a user",
            ],
            resources: &[
                ("IDEO U design thinking resources", Course, Some("https://www.ideou.com")),
                ("Maker space or design club", Community, None),
            ],
        },
        "project_management" => Plan {
            strategies: &[
                "Break a school project into tasks with deadlines and track them",
                "Run a weekly check-in for a group project",
                "Use a simple task board for personal goals",
            ],
            resources: &[
                ("Introduction to project management course", Course, None),
                ("Task board practice", Practice, None),
            ],
        },
        _ => return None,
    };
    Some(plan)
}

/// Strategies for developing the competency.
pub fn strategies_for(competency_id: &str) -> Vec<String> {
    match plan_for(competency_id) {
        Some(plan) => plan.strategies.iter().map(|s| s.to_string()).collect(),
        None => {
            let name = taxonomy::display_name(competency_id).to_lowercase();
            vec![
                format!("Set aside regular weekly practice time for {name}"),
                format!("Find a teacher or mentor experienced in {name}"),
                format!("Take on a small project that puts {name} to use"),
            ]
        }
    }
}

pub fn resources_for(competency_id: &str) -> Vec<Resource> {
    match plan_for(competency_id) {
        Some(plan) => plan
            .resources
            .iter()
            .map(|(title, kind, url)| Resource {
                title: title.to_string(),
                kind: *kind,
                url: url.map(str::to_string),
            })
            .collect(),
        None => {
            let name = taxonomy::display_name(competency_id);
            vec![
                Resource {
                    title: format!("Introductory course in {name}"),
                    kind: ResourceKind::Course,
                    url: None,
                },
                Resource {
                    title: format!("{name} club or study group"),
                    kind: ResourceKind::Community,
                    url: None,
                },
            ]
        }
    }
}
