use roster_types::{Formation, FormationSlot, GameFormat, LineRole};

type Catalogue = &'static [(&'static str, &'static str, &'static [(&'static str, LineRole)])];

const SEVEN_A_SIDE: Catalogue = &[
    (
        "1-2-2-1-7v7",
        "1-2-2-1",
        &[
            ("GK", LineRole::Goalkeeper),
            ("LB", LineRole::Defender),
            ("RB", LineRole::Defender),
            ("LM", LineRole::Midfielder),
            ("RM", LineRole::Midfielder),
            ("F", LineRole::Forward),
        ],
    ),
    (
        "1-3-2-7v7",
        "1-3-2",
        &[
            ("GK", LineRole::Goalkeeper),
            ("LB", LineRole::Defender),
            ("CB", LineRole::Defender),
            ("RB", LineRole::Defender),
            ("CM", LineRole::Midfielder),
            ("LF", LineRole::Forward),
            ("RF", LineRole::Forward),
        ],
    ),
];

const NINE_A_SIDE: Catalogue = &[
    (
        "1-3-3-2-9v9",
        "1-3-3-2",
        &[
            ("GK", LineRole::Goalkeeper),
            ("LB", LineRole::Defender),
            ("CB", LineRole::Defender),
            ("RB", LineRole::Defender),
            ("LM", LineRole::Midfielder),
            ("CM", LineRole::Midfielder),
            ("RM", LineRole::Midfielder),
            ("LF", LineRole::Forward),
            ("RF", LineRole::Forward),
        ],
    ),
    (
        "1-4-3-1-9v9",
        "1-4-3-1",
        &[
            ("GK", LineRole::Goalkeeper),
            ("LB", LineRole::Defender),
            ("LCB", LineRole::Defender),
            ("RCB", LineRole::Defender),
            ("RB", LineRole::Defender),
            ("LM", LineRole::Midfielder),
            ("CM", LineRole::Midfielder),
            ("RM", LineRole::Midfielder),
            ("F", LineRole::Forward),
        ],
    ),
];

const ELEVEN_A_SIDE: Catalogue = &[
    (
        "1-4-4-2-11v11",
        "1-4-4-2",
        &[
            ("GK", LineRole::Goalkeeper),
            ("LB", LineRole::Defender),
            ("LCB", LineRole::Defender),
            ("RCB", LineRole::Defender),
            ("RB", LineRole::Defender),
            ("LM", LineRole::Midfielder),
            ("LCM", LineRole::Midfielder),
            ("RCM", LineRole::Midfielder),
            ("RM", LineRole::Midfielder),
            ("LF", LineRole::Forward),
            ("RF", LineRole::Forward),
        ],
    ),
    (
        "1-4-3-3-11v11",
        "1-4-3-3",
        &[
            ("GK", LineRole::Goalkeeper),
            ("LB", LineRole::Defender),
            ("LCB", LineRole::Defender),
            ("RCB", LineRole::Defender),
            ("RB", LineRole::Defender),
            ("LCM", LineRole::Midfielder),
            ("CM", LineRole::Midfielder),
            ("RCM", LineRole::Midfielder),
            ("LW", LineRole::Forward),
            ("ST", LineRole::Forward),
            ("RW", LineRole::Forward),
        ],
    ),
];

fn catalogue(format: GameFormat) -> Catalogue {
    match format {
        GameFormat::SevenASide => SEVEN_A_SIDE,
        GameFormat::NineASide => NINE_A_SIDE,
        GameFormat::ElevenASide => ELEVEN_A_SIDE,
    }
}

fn build(format: GameFormat, id: &str, name: &str, slots: &[(&str, LineRole)]) -> Formation {
    Formation {
        id: id.to_string(),
        name: name.to_string(),
        format,
        slots: slots
            .iter()
            .map(|(slot, role)| FormationSlot {
                name: slot.to_string(),
                role: *role,
            })
            .collect(),
    }
}

/// All formations available for a game format, default first.
pub fn formations_for(format: GameFormat) -> Vec<Formation> {
    catalogue(format)
        .iter()
        .map(|(id, name, slots)| build(format, id, name, slots))
        .collect()
}

pub fn default_formation(format: GameFormat) -> Formation {
    let (id, name, slots) = catalogue(format)[0];
    build(format, id, name, slots)
}

pub fn find_formation(id: &str) -> Option<Formation> {
    [
        GameFormat::SevenASide,
        GameFormat::NineASide,
        GameFormat::ElevenASide,
    ]
    .into_iter()
    .flat_map(formations_for)
    .find(|formation| formation.id == id)
}
