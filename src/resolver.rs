//! Name → code resolution against the gazetteer.
//!
//! A name found verbatim is resolved directly. Otherwise the administrative
//! suffixes are appended one by one (`朝阳` → `朝阳省`, `朝阳自治区`,
//! `朝阳市`, ...) and the attempts are combined by a few tier rules.
//!
//! Ambiguous names (several units share one name) are settled by, in order:
//!
//! 1. the record's origin code: a candidate lying under it wins;
//! 2. the recognition context: a candidate lying under a province (for
//!    cities) or a city (for districts) already confirmed in this document.
//!
//! A name that passes neither test is left unresolved.

use std::collections::BTreeSet;

use tracing::debug;

use crate::gazetteer::{Gazetteer, Unit};

/// Suffixes tried when a name is not in the gazetteer verbatim. Provincial
/// and regional first, then municipal, then district/county, then the
/// autonomous variants.
pub const REGION_SUFFIXES: &[&str] = &[
    "省",
    "自治区",
    "市",
    "区",
    "县",
    "壮族自治区",
    "回族自治区",
    "维吾尔自治区",
    "自治县",
    "自治州",
];

/// Index of the last suffix at the municipal tier (`市`).
const MUNICIPAL_TIER: usize = 2;

const PROVINCE_CODE_LEN: usize = 2;
const CITY_CODE_LEN: usize = 4;
const CITY_LEVEL: usize = 2;

// ── Recognition context ──────────────────────────────────────────────────

/// Province and city codes confirmed so far in the current document.
///
/// Only unambiguous matches are recorded. Must be cleared (or replaced)
/// between documents; it deliberately outlives single sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionContext {
    provinces: BTreeSet<String>,
    cities: BTreeSet<String>,
}

impl RecognitionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.provinces.clear();
        self.cities.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty() && self.cities.is_empty()
    }

    pub fn has_province(&self, code: &str) -> bool {
        self.provinces.contains(code)
    }

    pub fn has_city(&self, code: &str) -> bool {
        self.cities.contains(code)
    }

    /// Level-1 units go to the province set, everything else to the city set.
    fn record(&mut self, unit: Unit<'_>) {
        let set = if unit.level() == 1 {
            &mut self.provinces
        } else {
            &mut self.cities
        };
        set.insert(unit.code().to_string());
    }

    /// Whether `unit` lies under a confirmed code of the level above it.
    fn confirms(&self, unit: Unit<'_>) -> bool {
        let seen = if unit.level() == CITY_LEVEL {
            &self.provinces
        } else {
            &self.cities
        };
        seen.iter().any(|code| unit.is_descendant_of(code))
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'g> {
    gazetteer: &'g Gazetteer,
}

impl<'g> Resolver<'g> {
    pub fn new(gazetteer: &'g Gazetteer) -> Self {
        Resolver { gazetteer }
    }

    /// Resolve `term` to an administrative code.
    ///
    /// `origin` is the publisher's region code; `None` (or an empty code)
    /// turns off origin preference. Unambiguous hits are recorded in `ctx`.
    pub fn resolve(
        &self,
        term: &str,
        origin: Option<&str>,
        ctx: &mut RecognitionContext,
    ) -> Option<&'g str> {
        let origin = origin.filter(|o| !o.is_empty());
        if self.gazetteer.contains(term) {
            self.resolve_direct(term, origin, ctx)
        } else {
            self.resolve_with_suffixes(term, origin, ctx)
        }
    }

    /// Resolve a name that must appear verbatim in the gazetteer.
    pub fn resolve_direct(
        &self,
        term: &str,
        origin: Option<&str>,
        ctx: &mut RecognitionContext,
    ) -> Option<&'g str> {
        let candidates = self.gazetteer.lookup(term);
        match candidates.as_slice() {
            [] => None,
            [only] => {
                ctx.record(*only);
                Some(only.code())
            }
            _ => {
                let chosen = origin
                    .and_then(|o| candidates.iter().find(|u| u.is_descendant_of(o)))
                    .or_else(|| candidates.iter().find(|u| ctx.confirms(**u)));
                match chosen {
                    Some(unit) => Some(unit.code()),
                    None => {
                        debug!(term, candidates = candidates.len(), "ambiguous name left unresolved");
                        None
                    }
                }
            }
        }
    }

    /// Try `term` + each of [`REGION_SUFFIXES`] and combine the outcomes.
    ///
    /// The first hit is kept, unless a later attempt vetoes it:
    /// district-tier hits outside every confirmed province and city clear the
    /// result, as do coarse-tier hits whose code is finer than a city. A hit
    /// under the origin code always replaces the result.
    pub fn resolve_with_suffixes(
        &self,
        term: &str,
        origin: Option<&str>,
        ctx: &mut RecognitionContext,
    ) -> Option<&'g str> {
        let mut result = None;
        let mut taken_first = false;

        for (tier, suffix) in REGION_SUFFIXES.iter().enumerate() {
            let name = format!("{term}{suffix}");
            let Some(code) = self.resolve_direct(&name, origin, ctx) else {
                continue;
            };

            if !taken_first {
                result = Some(code);
                taken_first = true;
            }
            if tier > MUNICIPAL_TIER && code.len() > PROVINCE_CODE_LEN && !confirmed_prefix(code, ctx) {
                result = None;
            }
            if tier <= MUNICIPAL_TIER && code.len() > CITY_CODE_LEN {
                result = None;
            }
            if origin.is_some_and(|o| code.starts_with(o)) {
                result = Some(code);
            }
        }
        result
    }
}

/// Whether the province or city part of `code` has been confirmed.
fn confirmed_prefix(code: &str, ctx: &RecognitionContext) -> bool {
    let province = code.get(..PROVINCE_CODE_LEN).is_some_and(|p| ctx.has_province(p));
    let city = code.get(..CITY_CODE_LEN).is_some_and(|c| ctx.has_city(c));
    province || city
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::tests::{leaf, node, sample};

    #[test]
    fn test_unique_name_records_context() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();

        assert_eq!(r.resolve("吉林省", None, &mut ctx), Some("22"));
        assert!(ctx.has_province("22"));

        assert_eq!(r.resolve("长春市", None, &mut ctx), Some("2201"));
        assert!(ctx.has_city("2201"));

        // Districts land in the city set too.
        assert_eq!(r.resolve("南关区", None, &mut ctx), Some("220102"));
        assert!(ctx.has_city("220102"));
    }

    #[test]
    fn test_ambiguous_name_prefers_origin() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();

        assert_eq!(r.resolve("朝阳区", Some("11"), &mut ctx), Some("110105"));
        assert_eq!(r.resolve("朝阳区", Some("22"), &mut ctx), Some("220104"));
        // Ambiguous hits never feed the context.
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_ambiguous_name_uses_context() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();

        // Nothing to go on.
        assert_eq!(r.resolve("朝阳区", Some("44"), &mut ctx), None);
        assert_eq!(r.resolve("朝阳区", None, &mut ctx), None);

        // The Beijing 朝阳区 sits directly under the province (its city is a
        // filler), so it is checked against confirmed provinces.
        r.resolve("北京市", None, &mut ctx);
        assert_eq!(r.resolve("朝阳区", None, &mut ctx), Some("110105"));

        // The Changchun one is a district and needs a confirmed city.
        let mut ctx = RecognitionContext::new();
        r.resolve("长春市", None, &mut ctx);
        assert_eq!(r.resolve("朝阳区", Some("44"), &mut ctx), Some("220104"));
    }

    #[test]
    fn test_origin_beats_context() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();
        r.resolve("长春市", None, &mut ctx);
        assert_eq!(r.resolve("朝阳区", Some("11"), &mut ctx), Some("110105"));
    }

    #[test]
    fn test_city_level_ambiguity_against_provinces() {
        let regions = vec![
            node(
                "11",
                "甲省",
                vec![node("1100", "某市", vec![leaf("110001", "朝阳区")])],
            ),
            node(
                "22",
                "乙省",
                vec![node("2200", "他市", vec![leaf("220001", "朝阳区")])],
            ),
        ];
        let g = Gazetteer::from_regions(&regions).unwrap();
        let r = Resolver::new(&g);

        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("朝阳区", Some("11"), &mut ctx), Some("110001"));

        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("朝阳区", Some("33"), &mut ctx), None);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_suffix_lookup_municipal() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("长春", None, &mut ctx), Some("2201"));
        assert_eq!(r.resolve("吉林", None, &mut ctx), Some("22"));
        assert_eq!(r.resolve("北京", None, &mut ctx), Some("11"));
    }

    #[test]
    fn test_suffix_lookup_rejects_unconfirmed_district() {
        let g = sample();
        let r = Resolver::new(&g);

        // 南关 → 南关区 is a district-tier hit with no confirmed province/city.
        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("南关", None, &mut ctx), None);
        // The unique direct hit was still recorded.
        assert!(ctx.has_city("220102"));

        // Once 吉林省 is confirmed the same hit survives.
        let mut ctx = RecognitionContext::new();
        r.resolve("吉林省", None, &mut ctx);
        assert_eq!(r.resolve("南关", None, &mut ctx), Some("220102"));
    }

    #[test]
    fn test_suffix_lookup_origin_always_wins() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("南关", Some("22"), &mut ctx), Some("220102"));
    }

    #[test]
    fn test_suffix_lookup_first_hit_kept() {
        // 朝阳 → 朝阳市 (2113, municipal tier) first, then 朝阳区 (ambiguous,
        // resolved by origin) at the district tier.
        let g = sample();
        let r = Resolver::new(&g);

        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("朝阳", None, &mut ctx), Some("2113"));

        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("朝阳", Some("11"), &mut ctx), Some("110105"));
    }

    #[test]
    fn test_suffix_lookup_coarse_tier_rejects_fine_code() {
        // A district literally named 某某市 (county-level city) hit at the
        // municipal tier is finer than a city code and is dropped.
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("北票", None, &mut ctx), None);
        assert_eq!(r.resolve("北票", Some("21"), &mut ctx), Some("211381"));
    }

    #[test]
    fn test_unknown_term() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();
        assert_eq!(r.resolve("上海", Some("31"), &mut ctx), None);
        assert_eq!(r.resolve("", None, &mut ctx), None);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_clear_context() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();
        r.resolve("北京市", None, &mut ctx);
        assert_eq!(r.resolve("朝阳区", None, &mut ctx), Some("110105"));
        ctx.clear();
        assert!(ctx.is_empty());
        assert_eq!(r.resolve("朝阳区", None, &mut ctx), None);
    }

    #[test]
    fn test_empty_origin_is_no_origin() {
        let g = sample();
        let r = Resolver::new(&g);
        let mut ctx = RecognitionContext::new();
        // An empty origin would prefix every code; it must not.
        assert_eq!(r.resolve("南关", Some(""), &mut ctx), None);
    }
}
