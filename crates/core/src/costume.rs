//! Built-in costume preset catalog.
//!
//! Each preset pairs a display entry with the full generation prompt the
//! UI submits when the user picks it. The `img` token in the prompts is
//! the trigger word the PhotoMaker pipeline replaces with the uploaded
//! face.

use serde::Serialize;

/// Who a costume is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Boy,
    Girl,
}

/// A selectable costume preset.
#[derive(Debug, Clone, Serialize)]
pub struct Costume {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub gender: Gender,
    pub prompt: &'static str,
}

/// All built-in costume presets.
pub const COSTUMES: &[Costume] = &[
    Costume {
        id: "mordechai",
        name: "Mordechai",
        description: "Mordechai costume with a royal robe",
        gender: Gender::Boy,
        prompt: "A boy img as a noble Jewish man wearing a royal blue and gold robe with \
                 silver embroidery, long white beard, dignified pose in palace courtyard, \
                 traditional Jewish clothing from ancient Persia, modest dress, cinematic \
                 lighting, high quality portrait",
    },
    Costume {
        id: "moshe",
        name: "Moshe",
        description: "Moshe costume with a flowing white robe",
        gender: Gender::Boy,
        prompt: "A boy img as a wise prophet wearing flowing white and gold robes, holding \
                 a wooden staff, standing dignified on mountain top, dramatic desert sunrise \
                 background, modest traditional clothing, majestic atmosphere, high quality \
                 portrait",
    },
    Costume {
        id: "doctor-boy",
        name: "Doctor",
        description: "Doctor costume with a white coat and stethoscope",
        gender: Gender::Boy,
        prompt: "A boy img as a kind doctor wearing a pristine white coat and stethoscope, \
                 in modern medical office with advanced equipment, caring expression, modest \
                 professional attire, soft professional lighting, high quality portrait",
    },
    Costume {
        id: "king-solomon",
        name: "King Solomon",
        description: "Wise King Solomon costume",
        gender: Gender::Boy,
        prompt: "A boy img as wise king Solomon wearing majestic deep blue and gold robes \
                 with intricate patterns, golden crown, sitting on ornate throne in grand \
                 palace hall, dignified pose, traditional biblical clothing, dramatic royal \
                 lighting",
    },
    Costume {
        id: "esther",
        name: "Queen Esther",
        description: "Queen Esther costume with a modest royal dress",
        gender: Gender::Girl,
        prompt: "A girl img as modest queen Esther wearing an elegant long royal dress in \
                 deep purple with gold embroidery, delicate crown, dignified pose in Persian \
                 palace garden, traditional modest Jewish clothing covering shoulders and \
                 knees, soft regal lighting",
    },
    Costume {
        id: "miriam",
        name: "Miriam",
        description: "Miriam the prophetess costume with a tambourine",
        gender: Gender::Girl,
        prompt: "A girl img as a noble prophetess wearing flowing blue and white robes, \
                 holding decorative tambourine, standing by oasis in desert, traditional \
                 biblical clothing modestly covering shoulders and knees, warm desert sunset \
                 lighting",
    },
    Costume {
        id: "doctor-girl",
        name: "Doctor",
        description: "Doctor costume with a white coat and stethoscope",
        gender: Gender::Girl,
        prompt: "A girl img as a compassionate doctor wearing professional white coat and \
                 stethoscope, in modern hospital setting with medical charts, modest \
                 professional attire covering shoulders and knees, natural medical office \
                 lighting",
    },
    Costume {
        id: "sarah",
        name: "Sarah",
        description: "Noble matriarch Sarah costume",
        gender: Gender::Girl,
        prompt: "A girl img as matriarch Sarah wearing long modest earth-toned robes with \
                 elegant embroidery, traditional head covering, dignified pose by desert \
                 tent, biblical clothing covering shoulders and knees, warm evening lighting \
                 with tent backdrop",
    },
    Costume {
        id: "teacher",
        name: "Teacher",
        description: "Classroom teacher costume",
        gender: Gender::Girl,
        prompt: "A girl img as an inspiring teacher wearing elegant modest outfit in warm \
                 neutral colors, standing by classroom blackboard with books and globe, \
                 professional attire covering shoulders and knees, cheerful classroom \
                 lighting",
    },
];

/// Look up a preset by id.
pub fn find(id: &str) -> Option<&'static Costume> {
    COSTUMES.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for costume in COSTUMES {
            assert!(seen.insert(costume.id), "duplicate costume id {}", costume.id);
        }
    }

    #[test]
    fn find_known_preset() {
        let costume = find("esther").unwrap();
        assert_eq!(costume.name, "Queen Esther");
        assert_eq!(costume.gender, Gender::Girl);
    }

    #[test]
    fn find_unknown_preset_returns_none() {
        assert!(find("astronaut").is_none());
    }

    #[test]
    fn every_prompt_carries_the_trigger_word() {
        for costume in COSTUMES {
            assert!(
                costume.prompt.contains(" img "),
                "prompt for {} is missing the img trigger word",
                costume.id
            );
        }
    }
}
