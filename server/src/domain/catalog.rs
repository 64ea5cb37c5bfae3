//! Services catalog
//!
//! The single definition of every service tag a listing can advertise. Filter
//! validation, listing validation and `GET /services` all read from here, so
//! the catalog is not editable at runtime.

use std::collections::HashSet;
use std::sync::LazyLock;

/// One selectable service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTag {
    pub id: &'static str,
    pub label: &'static str,
}

/// A named group of services, displayed together in the filter bar
#[derive(Debug, Clone, Copy)]
pub struct ServiceCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub tags: &'static [ServiceTag],
}

const fn tag(id: &'static str, label: &'static str) -> ServiceTag {
    ServiceTag { id, label }
}

pub static CATALOG: &[ServiceCategory] = &[
    ServiceCategory {
        id: "intercourse",
        label: "Intercourse",
        tags: &[
            tag("classic", "Classic"),
            tag("anal", "Anal"),
            tag("group", "Group"),
            tag("lesbian", "Lesbian"),
            tag("couples", "Services for couples"),
            tag("threesome_mff", "Threesome (MFF)"),
            tag("threesome_mmf", "Threesome (MMF)"),
        ],
    },
    ServiceCategory {
        id: "client_acts",
        label: "For the client",
        tags: &[
            tag("oral_protected", "Oral, protected"),
            tag("oral_unprotected", "Oral, unprotected"),
            tag("deep_oral", "Deep oral"),
            tag("oral_in_car", "Oral in car"),
            tag("cunnilingus", "Cunnilingus"),
            tag("kissing", "Kissing"),
            tag("sixty_nine", "69"),
            tag("rimming", "Rimming"),
            tag("finish_on_body", "Finish on body"),
            tag("finish_on_face", "Finish on face"),
            tag("finish_in_mouth", "Finish in mouth"),
        ],
    },
    ServiceCategory {
        id: "bdsm",
        label: "BDSM and fetish",
        tags: &[
            tag("bondage", "Bondage"),
            tag("domination", "Domination"),
            tag("light_domination", "Light domination"),
            tag("mistress", "Mistress"),
            tag("submission", "Submission"),
            tag("role_play", "Role play"),
            tag("foot_fetish", "Foot fetish"),
            tag("spanking_active", "Spanking, active"),
            tag("spanking_passive", "Spanking, passive"),
            tag("strapon", "Strap-on"),
            tag("toys", "Toys"),
            tag("golden_rain_active", "Golden rain, active"),
            tag("golden_rain_passive", "Golden rain, passive"),
        ],
    },
    ServiceCategory {
        id: "massage",
        label: "Massage",
        tags: &[
            tag("massage_classic", "Classic massage"),
            tag("massage_professional", "Professional massage"),
            tag("massage_relaxing", "Relaxing massage"),
            tag("massage_thai", "Thai massage"),
            tag("massage_erotic", "Erotic massage"),
            tag("massage_tantric", "Tantric massage"),
            tag("massage_urological", "Urological massage"),
            tag("massage_body", "Body-to-body massage"),
            tag("massage_lingam", "Lingam massage"),
            tag("sakura_branch", "Sakura branch"),
        ],
    },
    ServiceCategory {
        id: "shows",
        label: "Shows",
        tags: &[
            tag("striptease_pro", "Striptease, professional"),
            tag("striptease_amateur", "Striptease, amateur"),
            tag("lesbian_show_light", "Lesbian show, light"),
            tag("lesbian_show_explicit", "Lesbian show, explicit"),
            tag("belly_dance", "Belly dance"),
            tag("pole_dance", "Pole dance"),
            tag("private_show", "Private show"),
        ],
    },
    ServiceCategory {
        id: "virtual",
        label: "Virtual",
        tags: &[
            tag("virtual_sex", "Virtual sex"),
            tag("phone_sex", "Phone sex"),
            tag("video_call", "Video call"),
            tag("webcam_show", "Webcam show"),
            tag("photo_exchange", "Photo exchange"),
        ],
    },
    ServiceCategory {
        id: "companionship",
        label: "Companionship",
        tags: &[
            tag("escort", "Escort"),
            tag("girlfriend_experience", "Girlfriend experience"),
            tag("dinner_date", "Dinner date"),
            tag("party_companion", "Party companion"),
            tag("travel_companion", "Travel companion"),
            tag("corporate_events", "Corporate events"),
            tag("overnight_stay", "Overnight stay"),
            tag("trips_abroad", "Trips abroad"),
        ],
    },
    ServiceCategory {
        id: "misc",
        label: "Miscellaneous",
        tags: &[
            tag("photo_shoot", "Photo shoot"),
            tag("video_shoot", "Video shoot"),
            tag("costumes", "Costumes"),
            tag("shower_together", "Shower together"),
            tag("sauna", "Sauna"),
            tag("couples_welcome", "Couples welcome"),
            tag("beginners_welcome", "Beginners welcome"),
            tag("accessible", "Accessible venue"),
        ],
    },
];

static KNOWN_TAGS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| all_tags().map(|t| t.id).collect());

/// Iterate over every tag in catalog order
pub fn all_tags() -> impl Iterator<Item = &'static ServiceTag> {
    CATALOG.iter().flat_map(|category| category.tags.iter())
}

pub fn is_known_service(id: &str) -> bool {
    KNOWN_TAGS.contains(id)
}

/// Return the tags from `ids` that the catalog does not define, in input order
pub fn unknown_services<'a, I>(ids: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().filter(|id| !is_known_service(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_ids_are_unique() {
        let total = all_tags().count();
        assert_eq!(KNOWN_TAGS.len(), total, "duplicate tag id in catalog");
        assert!(total >= 60, "catalog unexpectedly small: {}", total);
    }

    #[test]
    fn test_category_ids_are_unique() {
        let ids: HashSet<&str> = CATALOG.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
        assert!(CATALOG.iter().all(|c| !c.tags.is_empty()));
    }

    #[test]
    fn test_is_known_service() {
        assert!(is_known_service("classic"));
        assert!(is_known_service("massage_thai"));
        assert!(!is_known_service("Classic"));
        assert!(!is_known_service(""));
    }

    #[test]
    fn test_unknown_services_preserves_order() {
        let unknown = unknown_services(["escort", "teleportation", "classic", "juggling"]);
        assert_eq!(unknown, vec!["teleportation", "juggling"]);
    }
}
