use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use geo_tagger_types::RegionNode;
use tracing::info;

use crate::error::{Error, Result};

/// City/district labels that name no place of their own ("directly governed
/// districts", "urban area", ...). A city carrying one of these hands its
/// children to the province; a district carrying one is dropped.
pub const FILLER_LABELS: &[&str] = &["市辖区", "城区", "矿区", "郊区", "省直辖县级行政区划"];

/// Deepest level of the hierarchy: province → city → district.
const MAX_DEPTH: usize = 3;

fn is_filler(name: &str) -> bool {
    FILLER_LABELS.contains(&name)
}

/// Index of a [`GeoUnit`] inside its [`Gazetteer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct UnitId(usize);

/// One administrative unit. The code encodes the hierarchy by prefix:
/// 2 digits for a province, 4 for a city, 6 or more for a district.
#[derive(Debug, Clone)]
struct GeoUnit {
    code: String,
    name: String,
    parent: Option<UnitId>,
}

/// Name → administrative units dictionary. Owns every unit for its whole
/// lifetime and never changes after loading.
#[derive(Debug, Default)]
pub struct Gazetteer {
    units: Vec<GeoUnit>,
    by_name: HashMap<String, Vec<UnitId>>,
}

impl Gazetteer {
    /// Load a JSON gazetteer file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::open(path, e))?;
        let gazetteer = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            units = gazetteer.len(),
            names = gazetteer.by_name.len(),
            "gazetteer loaded"
        );
        Ok(gazetteer)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let regions: Vec<RegionNode> = serde_json::from_str(json)?;
        Self::from_regions(&regions)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let regions: Vec<RegionNode> = serde_json::from_reader(reader)?;
        Self::from_regions(&regions)
    }

    /// Build from an already-parsed hierarchy. The whole tree is validated
    /// first, so an error never leaves a half-built gazetteer behind.
    pub fn from_regions(provinces: &[RegionNode]) -> Result<Self> {
        for province in provinces {
            validate(province, "", 1)?;
        }

        let mut g = Gazetteer::default();
        for province in provinces {
            let province_id = g.register(province, None);
            for city in &province.childs {
                let parent = if is_filler(&city.name) {
                    province_id
                } else {
                    g.register(city, Some(province_id))
                };
                for district in &city.childs {
                    if is_filler(&district.name) {
                        continue;
                    }
                    g.register(district, Some(parent));
                }
            }
        }
        Ok(g)
    }

    fn register(&mut self, node: &RegionNode, parent: Option<UnitId>) -> UnitId {
        let id = UnitId(self.units.len());
        self.units.push(GeoUnit {
            code: node.code.clone(),
            name: node.name.clone(),
            parent,
        });
        self.by_name.entry(node.name.clone()).or_default().push(id);
        id
    }

    // ── Lookup ───────────────────────────────────────────────────────────

    /// All units registered under `name`, in load order.
    pub fn lookup(&self, name: &str) -> Vec<Unit<'_>> {
        self.by_name
            .get(name)
            .map(|ids| ids.iter().map(|&id| self.handle(id)).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered units (not distinct names).
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn handle(&self, id: UnitId) -> Unit<'_> {
        Unit {
            gazetteer: self,
            id,
        }
    }
}

fn validate(node: &RegionNode, parent_path: &str, depth: usize) -> Result<()> {
    let path = if parent_path.is_empty() {
        node.name.clone()
    } else {
        format!("{parent_path}/{}", node.name)
    };
    if node.name.trim().is_empty() {
        return Err(Error::gazetteer(path, "empty name"));
    }
    if node.code.is_empty() || !node.code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::gazetteer(
            path,
            format!("code {:?} is not a decimal code", node.code),
        ));
    }
    if depth == MAX_DEPTH && !node.childs.is_empty() {
        return Err(Error::gazetteer(
            path,
            format!("hierarchy deeper than {MAX_DEPTH} levels"),
        ));
    }
    for child in &node.childs {
        validate(child, &path, depth + 1)?;
    }
    Ok(())
}

// ── Unit handle ──────────────────────────────────────────────────────────

/// A borrowed view of one unit that can walk its parent chain.
#[derive(Clone, Copy)]
pub struct Unit<'g> {
    gazetteer: &'g Gazetteer,
    id: UnitId,
}

impl<'g> Unit<'g> {
    pub fn code(&self) -> &'g str {
        &self.gazetteer.units[self.id.0].code
    }

    pub fn name(&self) -> &'g str {
        &self.gazetteer.units[self.id.0].name
    }

    pub fn parent(&self) -> Option<Unit<'g>> {
        self.gazetteer.units[self.id.0]
            .parent
            .map(|id| self.gazetteer.handle(id))
    }

    /// Parent, grandparent, ... up to the province. Excludes `self`.
    pub fn ancestors(&self) -> impl Iterator<Item = Unit<'g>> + use<'g> {
        std::iter::successors(self.parent(), |u| u.parent())
    }

    /// 1 for provinces, 2 for units directly under a province, and so on.
    pub fn level(&self) -> usize {
        1 + self.ancestors().count()
    }

    /// Whether some ancestor carries exactly `code`. Empty codes never match.
    pub fn is_descendant_of(&self, code: &str) -> bool {
        !code.is_empty() && self.ancestors().any(|a| a.code() == code)
    }
}

impl std::fmt::Debug for Unit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit")
            .field("code", &self.code())
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for Unit<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.gazetteer, other.gazetteer) && self.id == other.id
    }
}

impl Eq for Unit<'_> {}
