//! The built-in "Craftsmen of Archaic Korkyra" museum story.

use korkyra_core::ids::{MarkerId, MissionId, StageId};

use crate::registry::StageRegistry;
use crate::stage::{ActionEffect, Stage, StageAction};

fn go_to(label: &str, target: &str) -> StageAction {
    StageAction {
        label: label.to_owned(),
        effect: ActionEffect::GoTo {
            target: StageId::from(target),
        },
    }
}

/// Builds the built-in five-stage story.
///
/// The intro stage demonstrates the dynamically revealed follow-up
/// control; the end stage restarts the experience with a hard reset.
#[must_use]
pub fn builtin() -> StageRegistry {
    let stages = vec![
        Stage {
            id: StageId::from("intro"),
            title: "The Craftsmen of Archaic Korkyra".to_owned(),
            body: "Learn about the ancient world of Corfu through the eyes of skilled \
                   artisans.\n\nClick **\"continue\"** once you are ready."
                .to_owned(),
            background: None,
            actions: vec![StageAction {
                label: "Continue".to_owned(),
                effect: ActionEffect::RevealFollowUp {
                    label: "Continue".to_owned(),
                    target: StageId::from("role"),
                },
            }],
        },
        Stage {
            id: StageId::from("role"),
            title: "Your Quest".to_owned(),
            body: "Search and scan the markers scattered around the museum to unlock \
                   different customers.\n\nComplete their requests to earn **coins**!"
                .to_owned(),
            background: None,
            actions: vec![
                go_to("Continue", "main-screen"),
                go_to("Game Instructions", "instructions"),
            ],
        },
        Stage {
            id: StageId::from("main-screen"),
            title: "Main Hub".to_owned(),
            body: "Click \"Go!\" to enter AR Mode and start looking for markers.\n\nOnce \
                   you have collected enough **coins**, click \"Finish Task\" to complete \
                   the experience."
                .to_owned(),
            background: None,
            actions: vec![
                StageAction {
                    label: "Go!".to_owned(),
                    effect: ActionEffect::EnterAr,
                },
                go_to("Finish Task", "end"),
                go_to("Back", "role"),
            ],
        },
        Stage {
            id: StageId::from("instructions"),
            title: "How to Play — Overview".to_owned(),
            body: "- You play as different types of craftsmen & artisans of the Archaic \
                   Era.\n\
                   - Use your device camera to scan AR markers hidden in the environment.\n\
                   - Each marker reflects a different customer, based on the different \
                   casts of the time.\n\
                   - Choose the correct type of craftsman to fit your customer's needs, \
                   and make the proper item combinations.\n\
                   - If in doubt, read up info about the items requested by tapping on \
                   them!"
                .to_owned(),
            background: None,
            actions: vec![go_to("Back", "role")],
        },
        Stage {
            id: StageId::from("end"),
            title: "Congratulations!".to_owned(),
            body: "You have mastered the crafts of the Archaic Era.\n\nWould you like to \
                   play again?"
                .to_owned(),
            background: None,
            actions: vec![StageAction {
                label: "Play Again".to_owned(),
                effect: ActionEffect::Restart {
                    target: StageId::from("intro"),
                },
            }],
        },
    ];

    StageRegistry::new(StageId::from("intro"), stages)
        .expect("the built-in story is structurally valid")
}

/// Marker-to-mission bindings of the museum exhibit: the first card loads
/// mission 1, the second card mission 2.
#[must_use]
pub fn marker_bindings() -> Vec<(MarkerId, MissionId)> {
    vec![
        (MarkerId(0), MissionId::new(1).expect("positive")),
        (MarkerId(1), MissionId::new(2).expect("positive")),
    ]
}
