use shared::domain::Activity;

fn activity(
    name: &str,
    description: &str,
    schedule: &str,
    max_participants: u32,
    participants: [&str; 2],
) -> Activity {
    Activity {
        name: name.to_string(),
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

/// The activities every fresh process starts with.
pub fn default_activities() -> Vec<Activity> {
    vec![
        activity(
            "Basketball",
            "Join the basketball team and participate in matches",
            "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
            15,
            ["liam@mergington.edu", "noah@mergington.edu"],
        ),
        activity(
            "Soccer",
            "Play soccer and compete in inter-school tournaments",
            "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
            20,
            ["william@mergington.edu", "james@mergington.edu"],
        ),
        activity(
            "Painting Class",
            "Explore your creativity with painting and art techniques",
            "Wednesdays, 3:30 PM - 5:00 PM",
            10,
            ["ava@mergington.edu", "mia@mergington.edu"],
        ),
        activity(
            "Drama Club",
            "Learn acting and participate in school plays",
            "Fridays, 4:00 PM - 5:30 PM",
            12,
            ["amelia@mergington.edu", "harper@mergington.edu"],
        ),
        activity(
            "Debate Team",
            "Develop public speaking and critical thinking skills",
            "Thursdays, 3:30 PM - 5:00 PM",
            8,
            ["elijah@mergington.edu", "lucas@mergington.edu"],
        ),
        activity(
            "Math Club",
            "Solve challenging math problems and participate in competitions",
            "Mondays, 3:30 PM - 4:30 PM",
            10,
            ["charlotte@mergington.edu", "sophia@mergington.edu"],
        ),
        activity(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            ["michael@mergington.edu", "daniel@mergington.edu"],
        ),
        activity(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            ["emma@mergington.edu", "sophia@mergington.edu"],
        ),
        activity(
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            ["john@mergington.edu", "olivia@mergington.edu"],
        ),
    ]
}
