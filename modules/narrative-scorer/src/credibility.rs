//! Credibility: a weighted mean over members of a per-event credibility
//! prior (spec §4.3). Each source kind derives its prior differently —
//! onchain sources get a flat prior, twitter depends on a follower-count
//! metric, rss_blog on an official-list match, github on a URL-host
//! allowlist match.

use narrative_types::config::CredibilityConfig;
use narrative_types::{SignalEvent, SourceTag};

/// Prior for a single event. Weighting by `relevance` in the caller's mean
/// is deliberate: a low-relevance mention of a highly credible source
/// shouldn't dominate the average the way a single on-topic one does.
pub fn event_prior(event: &SignalEvent, cfg: &CredibilityConfig) -> f64 {
    match event.source {
        SourceTag::TxActivity | SourceTag::ProgramDeploy | SourceTag::TokenActivity => {
            cfg.onchain_prior
        }
        SourceTag::Twitter => {
            let followers = event.metrics.get("followers").copied().unwrap_or(0.0);
            if followers >= cfg.twitter_follower_threshold {
                cfg.twitter_high
            } else {
                cfg.twitter_low
            }
        }
        SourceTag::RssBlog => {
            let is_official = event
                .url
                .as_deref()
                .map(|url| cfg.official_blogs.iter().any(|official| url.contains(official)))
                .unwrap_or(false);
            if is_official {
                cfg.blog_official
            } else {
                cfg.blog_other
            }
        }
        SourceTag::Github => {
            let allowlisted = event
                .url
                .as_deref()
                .map(|url| cfg.github_allowlist.iter().any(|domain| url.contains(domain)))
                .unwrap_or(false);
            if allowlisted {
                (cfg.github_base + cfg.github_allowlist_bonus).min(1.0)
            } else {
                cfg.github_base
            }
        }
    }
}

/// Weighted mean of `event_prior` over `members`, weighted by relevance.
/// Members with zero total relevance fall back to an unweighted mean so a
/// narrative made entirely of zero-relevance events isn't divided by zero.
pub fn credibility(members: &[&SignalEvent], cfg: &CredibilityConfig) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let total_weight: f64 = members.iter().map(|e| e.relevance).sum();
    if total_weight <= 0.0 {
        return members.iter().map(|e| event_prior(e, cfg)).sum::<f64>() / members.len() as f64;
    }
    members
        .iter()
        .map(|e| event_prior(e, cfg) * e.relevance)
        .sum::<f64>()
        / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(source: SourceTag) -> SignalEvent {
        SignalEvent::new("e", source, Utc::now(), "title", "text", 1.0)
    }

    #[test]
    fn onchain_sources_get_flat_prior() {
        let cfg = CredibilityConfig::default();
        assert_eq!(event_prior(&event(SourceTag::TxActivity), &cfg), cfg.onchain_prior);
        assert_eq!(event_prior(&event(SourceTag::ProgramDeploy), &cfg), cfg.onchain_prior);
        assert_eq!(event_prior(&event(SourceTag::TokenActivity), &cfg), cfg.onchain_prior);
    }

    #[test]
    fn twitter_prior_depends_on_follower_threshold() {
        let cfg = CredibilityConfig::default();
        let low = event(SourceTag::Twitter).with_metric("followers", 500.0);
        let high = event(SourceTag::Twitter).with_metric("followers", 50_000.0);
        assert_eq!(event_prior(&low, &cfg), cfg.twitter_low);
        assert_eq!(event_prior(&high, &cfg), cfg.twitter_high);
    }

    #[test]
    fn rss_blog_prior_depends_on_official_list() {
        let mut cfg = CredibilityConfig::default();
        cfg.official_blogs.push("blog.solana.com".to_string());
        let official = event(SourceTag::RssBlog).with_url("https://blog.solana.com/post");
        let other = event(SourceTag::RssBlog).with_url("https://random.example/post");
        assert_eq!(event_prior(&official, &cfg), cfg.blog_official);
        assert_eq!(event_prior(&other, &cfg), cfg.blog_other);
    }

    #[test]
    fn github_prior_gets_allowlist_bonus_capped_at_one() {
        let mut cfg = CredibilityConfig::default();
        cfg.github_base = 0.98;
        cfg.github_allowlist_bonus = 0.10;
        cfg.github_allowlist.push("github.com/solana-labs".to_string());
        let allowlisted = event(SourceTag::Github).with_url("https://github.com/solana-labs/solana");
        assert_eq!(event_prior(&allowlisted, &cfg), 1.0);
    }

    #[test]
    fn credibility_is_relevance_weighted_mean() {
        let cfg = CredibilityConfig::default();
        let high_relevance_onchain =
            SignalEvent::new("a", SourceTag::TxActivity, Utc::now(), "t", "x", 1.0);
        let low_relevance_twitter =
            SignalEvent::new("b", SourceTag::Twitter, Utc::now(), "t", "x", 0.1);
        let members = vec![&high_relevance_onchain, &low_relevance_twitter];
        let c = credibility(&members, &cfg);
        // dominated by the high-relevance onchain prior (0.90) rather than a
        // naive average with the low-credibility, low-relevance tweet.
        assert!(c > 0.85);
    }
}
