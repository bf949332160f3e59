#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::KpError;
    use crate::models::{DashaLevel, Domain, Planet};
    use crate::parsing::upstream::*;
    use crate::parsing::ChartDocument;
    use crate::test_fixtures::document;

    fn doc(domain: Domain, response: serde_json::Value) -> ChartDocument {
        ChartDocument::from_value(domain, json!({"status": 200, "response": response})).unwrap()
    }

    #[test]
    fn test_planet_positions_skip_ascendant() {
        let positions = planet_positions_from(&document(Domain::PlanetPosition)).unwrap();
        assert_eq!(positions.planets.len(), 1);
        let sun = &positions.planets[0];
        assert_eq!(sun.planet, Planet::Sun);
        assert_eq!(sun.name, "Su");
        assert_eq!(sun.house, 5);
        assert_eq!(sun.sign_lord, "Sun");
        assert_eq!(positions.dasa.current_dasa.as_deref(), Some("Su>Ju>Sa"));
    }

    #[test]
    fn test_kp_planets_project_pseudo_fields() {
        let kp = kp_planets_from(&document(Domain::PlanetAnalysis)).unwrap();
        assert_eq!(kp.planets.len(), 1);
        let sun = &kp.planets[0];
        assert_eq!(sun.nakshatra, "Magha");
        assert_eq!(sun.nakshatra_lord, "Ketu");
        assert_eq!(sun.sub_lord_chain, vec!["Jupiter", "Saturn"]);
        assert_eq!(sun.pseudo_rasi.as_deref(), Some("Leo"));
        assert!(!sun.combust);
        assert!((kp.midheaven - 275.456).abs() < 1e-9);
    }

    #[test]
    fn test_kp_planets_accept_string_numbers() {
        let kp = kp_planets_from(&doc(
            Domain::PlanetAnalysis,
            json!({"3": {
                "name": "Mars", "zodiac": "Aries", "house": "11", "retro": true,
                "global_degree": 10.0, "local_degree": 10.0,
                "pseudo_nakshatra": "Ashwini", "pseudo_nakshatra_pada": 4.0,
                "pseudo_nakshatra_lord": "Ketu", "sub_lord": "Mars", "sub_sub_lord": "Rahu"
            }}),
        ))
        .unwrap();
        let mars = &kp.planets[0];
        assert_eq!(mars.house, 11);
        assert_eq!(mars.nakshatra_pada, 4);
        assert!(mars.retrograde);
        // Falls back to the sign lord table when the lord is not reported
        assert_eq!(mars.sign_lord, "Mars");
    }

    #[test]
    fn test_houses_keep_input_order_and_occupants() {
        let houses = houses_from(&document(Domain::House)).unwrap();
        assert_eq!(houses.len(), 12);
        let numbers: Vec<u8> = houses.iter().map(|h| h.house_number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());
        assert_eq!(houses[4].occupant_names(), vec!["Sun"]);
        assert!(houses.iter().filter(|h| !h.occupants.is_empty()).count() == 1);
    }

    #[test]
    fn test_houses_reject_wrong_count() {
        let mut value = crate::test_fixtures::value(Domain::House);
        value["response"].as_array_mut().unwrap().pop();
        let doc = ChartDocument::from_value(Domain::House, value).unwrap();
        let err = houses_from(&doc).unwrap_err();
        assert!(matches!(err, KpError::InvalidUpstreamData { .. }));
        assert!(err.to_string().contains("Expected 12 houses, found 11"));
    }

    #[test]
    fn test_houses_reject_duplicate_numbers() {
        let mut value = crate::test_fixtures::value(Domain::House);
        value["response"][11]["house"] = json!(1);
        let doc = ChartDocument::from_value(Domain::House, value).unwrap();
        let err = houses_from(&doc).unwrap_err();
        assert!(err.to_string().contains("exactly 1..12"));
    }

    #[test]
    fn test_mahadasha_expands_abbreviations() {
        let summary = mahadasha_from(&document(Domain::Mahadasha)).unwrap();
        let birth = summary.birth.unwrap();
        assert_eq!(birth.mahadasha(), Some("Venus"));
        assert_eq!(birth.antardasha(), Some("Moon"));
        assert_eq!(birth.pratyantardasha(), Some("Mars"));
        let current = summary.current.unwrap();
        assert_eq!(current.mahadasha(), Some("Sun"));
        assert_eq!(current.start_date(), Some("2024-03-05"));
        assert_eq!(summary.sequence.len(), 2);
        assert_eq!(summary.sequence[1].label, "Sun Mahadasha");
    }

    #[test]
    fn test_mahadasha_empty_chain_is_na() {
        let summary = mahadasha_from(&doc(Domain::Mahadasha, json!({"current_dasa": ""}))).unwrap();
        let current = summary.current.unwrap();
        assert_eq!(current.mahadasha(), Some("N/A"));
        assert_eq!(current.start_date(), Some("N/A"));
    }

    #[test]
    fn test_antardashas_group_by_mahadasha() {
        let periods = antardashas_from(&document(Domain::Antardasha)).unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].level, DashaLevel::Antardasha);
        assert_eq!(periods[0].owner, "Sun");
        assert_eq!(periods[0].periods[1].label, "Moon Antardasha");
        assert_eq!(periods[0].periods[1].date, "2020-09-19");
    }

    #[test]
    fn test_antardashas_skip_mismatched_lists() {
        let periods = antardashas_from(&doc(
            Domain::Antardasha,
            json!({
                "antardashas": [["Ke/Ke", "Ke/Ve"], ["Ve/Ve"]],
                "antardasha_order": [["2001-01-01"], ["2008-01-01"]]
            }),
        ))
        .unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].owner, "Venus");
        assert_eq!(periods[0].periods[0].label, "Venus Antardasha");
    }

    #[test]
    fn test_paryantardashas_use_compound_key() {
        let periods = paryantardashas_from(&document(Domain::Paryantardasha)).unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].owner, "Sun>Sun");
        assert_eq!(periods[0].periods[1].label, "Sun/Sun/Moon");
        assert_eq!(compound_key(" Venus ", "Moon "), "Venus>Moon");
    }

    #[test]
    fn test_yogas_normalize_names_and_check_strength() {
        let list = yogas_from(&document(Domain::Yoga)).unwrap();
        assert_eq!(list.yogas.len(), 2);
        assert_eq!(list.yogas[0].name, "Budha Aditya Yoga");
        assert_eq!(list.yogas[0].involved_houses, vec![5]);
        assert_eq!(list.total_count, 2);

        let err = yogas_from(&doc(
            Domain::Yoga,
            json!({"yogas_list": [{"yoga": "Hamsa", "strength_in_percentage": 120.0}]}),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("outside 0..100"));

        let list = yogas_from(&doc(
            Domain::Yoga,
            json!({"yogas_list": [{"yoga": "Hamsa", "strength_in_percentage": 55.5, "houses_involved": ["1", 4]}]}),
        ))
        .unwrap();
        assert_eq!(list.yogas[0].name, "Hamsa Yoga");
        assert_eq!(list.yogas[0].involved_houses, vec![1, 4]);
    }

    #[test]
    fn test_yogas_reject_blank_name() {
        for name in ["", "   "] {
            let err = yogas_from(&doc(
                Domain::Yoga,
                json!({"yogas_list": [{"yoga": name, "strength_in_percentage": 60.0}]}),
            ))
            .unwrap_err();
            assert!(matches!(err, KpError::InvalidUpstreamData { domain: Domain::Yoga, .. }));
            assert!(err.to_string().contains("blank name"));
        }
    }

    #[test]
    fn test_expand_chain() {
        assert_eq!(expand_chain("Ra>Ju>Me"), vec!["Rahu", "Jupiter", "Mercury"]);
        assert!(expand_chain("").is_empty());
    }
}
