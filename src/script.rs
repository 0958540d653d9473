use crate::coin::{CoinInfo, CoinRecord};
use crate::utils::{first_sentences, first_words, strip_markup, word_count};

pub const RISK_NOTE: &str = "Risk note: crypto assets are highly volatile, and there can be technical, security, and regulatory risks.";
pub const DISCLAIMER: &str = "This is not financial advice.";
pub const GENERIC_USE: &str = "It is designed for specific use cases within blockchain networks.";

pub const MAX_DESCRIPTION_WORDS: usize = 42;
pub const MAX_SCRIPT_WORDS: usize = 95;

pub fn compose(coin: &CoinRecord, info: &CoinInfo) -> String {
    let identity = format!(
        "Top 100 #{}: {} ({}) is a cryptocurrency project in the ecosystem.",
        coin.rank, coin.name, coin.symbol
    );
    let description = describe(info);
    let text = [identity.as_str(), description.as_str(), RISK_NOTE, DISCLAIMER].join(" ");

    if word_count(&text) <= MAX_SCRIPT_WORDS {
        return text;
    }

    // the disclaimer closes the text, so any cut removes at least part of it
    let room = MAX_SCRIPT_WORDS - word_count(DISCLAIMER);
    format!("{} {}", end_with_period(&first_words(&text, room)), DISCLAIMER)
}

/// Opening of the description, or a category/generic fallback when there is none.
pub fn describe(info: &CoinInfo) -> String {
    let base = first_sentences(&strip_markup(&info.description), 2);
    if !base.is_empty() {
        if word_count(&base) > MAX_DESCRIPTION_WORDS {
            return end_with_period(&first_words(&base, MAX_DESCRIPTION_WORDS));
        }
        return base;
    }

    match info.categories.first().filter(|c| !c.trim().is_empty()) {
        Some(category) => format!(
            "It is commonly associated with {} use cases.",
            category.trim().to_lowercase()
        ),
        None => GENERIC_USE.to_string(),
    }
}

pub fn title(coin: &CoinRecord) -> String {
    format!("#{} {} — What is it?", coin.rank, coin.symbol)
}

fn end_with_period(text: &str) -> String {
    let mut out = text
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '-'))
        .to_string();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin() -> CoinRecord {
        CoinRecord {
            rank: 3,
            name: "Tether".into(),
            symbol: "USDT".into(),
        }
    }

    fn info(description: &str, categories: &[&str]) -> CoinInfo {
        CoinInfo {
            description: description.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            logo_url: String::new(),
        }
    }

    fn long_description(words: usize) -> String {
        (0..words).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ") + "."
    }

    #[test]
    fn narration_has_four_sentences_in_order() {
        let text = compose(&coin(), &info("A stablecoin. Pegged to USD. Widely used.", &[]));
        assert_eq!(
            text,
            format!(
                "Top 100 #3: Tether (USDT) is a cryptocurrency project in the ecosystem. \
                 A stablecoin. Pegged to USD. {RISK_NOTE} {DISCLAIMER}"
            )
        );
    }

    #[test]
    fn empty_description_uses_first_category() {
        assert_eq!(
            describe(&info("", &["DeFi", "Governance"])),
            "It is commonly associated with defi use cases."
        );
    }

    #[test]
    fn empty_description_without_categories_uses_generic_sentence() {
        assert_eq!(describe(&info("", &[])), GENERIC_USE);
        assert_eq!(describe(&info("<p> </p>", &[])), GENERIC_USE);
    }

    #[test]
    fn long_description_is_cut_to_42_words() {
        let sentence = describe(&info(&long_description(80), &[]));
        assert_eq!(word_count(&sentence), MAX_DESCRIPTION_WORDS);
        assert!(sentence.ends_with("word41."));
    }

    #[test]
    fn cut_description_ends_with_a_single_period() {
        let desc = (0..50).map(|_| "word,").collect::<Vec<_>>().join(" ");
        let sentence = describe(&info(&desc, &[]));
        assert!(sentence.ends_with("word."));
        assert!(!sentence.ends_with(",."));
    }

    #[test]
    fn markup_is_removed_from_description() {
        assert_eq!(
            describe(&info("<b>Fast</b>  chain.\n<i>Cheap</i> fees.", &[])),
            "Fast chain. Cheap fees."
        );
    }

    #[test]
    fn overlong_narration_keeps_the_disclaimer() {
        let long_name = (0..60).map(|i| format!("N{i}")).collect::<Vec<_>>().join(" ");
        let coin = CoinRecord {
            rank: 99,
            name: long_name,
            symbol: "LONG".into(),
        };
        let text = compose(&coin, &info(&long_description(80), &[]));

        assert!(word_count(&text) <= MAX_SCRIPT_WORDS);
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn lookalike_phrase_in_description_does_not_replace_the_disclaimer() {
        let long_name = (0..60).map(|i| format!("N{i}")).collect::<Vec<_>>().join(" ");
        let coin = CoinRecord {
            rank: 42,
            name: long_name,
            symbol: "LOOK".into(),
        };
        let text = compose(&coin, &info("Holding it is not financial advice. It moves.", &[]));

        assert!(word_count(&text) <= MAX_SCRIPT_WORDS);
        assert!(text.to_lowercase().contains("this is not financial advice"));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn every_narration_is_bounded_and_disclaimed() {
        let descriptions = [
            String::new(),
            "Short.".to_string(),
            long_description(10),
            long_description(200),
            "No terminal punctuation at all".to_string(),
        ];
        for d in &descriptions {
            for cats in [&[][..], &["Meme"][..]] {
                let text = compose(&coin(), &info(d, cats));
                assert!(word_count(&text) <= MAX_SCRIPT_WORDS, "{text}");
                assert!(text.to_lowercase().contains("this is not financial advice"));
            }
        }
    }

    #[test]
    fn title_names_rank_and_symbol() {
        assert_eq!(title(&coin()), "#3 USDT — What is it?");
    }
}
