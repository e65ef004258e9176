//! Taxonomic navigation and mode restrictions as graph patterns.
//!
//! The hierarchy edge is the profile's subclass IRI in CLASS, INSTANCE and ITEM
//! modes and its sub-property IRI in PROPERTY mode. INSTANCE and ITEM modes also
//! follow the type edge, so an instance's parent is its declared class and a
//! class's children include its instances.

use crate::intent::{HierarchyFilter, Mode};
use crate::profile::DialectProfile;
use crate::text::{iri, var, vars, FreshVars};
use kblink_vocab::rdf;
use std::fmt::Write as _;

/// Writes hierarchy and membership patterns for one profile and mode.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyNavigator<'a> {
    profile: &'a DialectProfile,
    mode: Mode,
}

impl<'a> HierarchyNavigator<'a> {
    pub fn new(profile: &'a DialectProfile, mode: Mode) -> Self {
        Self { profile, mode }
    }

    /// The hierarchy edge IRI for this mode, if configured.
    pub fn edge(&self) -> Option<&'a str> {
        match self.mode {
            Mode::Property => self.profile.sub_property_iri.as_deref(),
            _ => self.profile.subclass_iri.as_deref(),
        }
    }

    fn property_type(&self) -> &'a str {
        self.profile
            .property_type_iri
            .as_deref()
            .unwrap_or(rdf::PROPERTY)
    }

    fn follows_type_edge(&self) -> bool {
        matches!(self.mode, Mode::Instance | Mode::Item)
    }

    /// Whether results of `filter` are subject to the mode restriction.
    ///
    /// Upward navigation in INSTANCE mode yields classes, and navigation in ITEM
    /// mode yields whatever the edges reach.
    pub fn restricts(&self, filter: Option<&HierarchyFilter>) -> bool {
        match (self.mode, filter) {
            (Mode::Instance, Some(f)) => f.is_downward() || *f == HierarchyFilter::Roots,
            (Mode::Item, Some(f)) => *f == HierarchyFilter::Roots,
            _ => true,
        }
    }

    /// Membership pattern for `mode`: a binding group when nothing else binds
    /// `?s`, otherwise a `FILTER EXISTS`.
    pub(crate) fn write_restriction(
        &self,
        mode: Mode,
        bound: bool,
        fresh: &mut FreshVars,
        out: &mut String,
    ) {
        let s = var(vars::SUBJECT);
        let ty = iri(&self.profile.type_iri);
        let group = match mode {
            Mode::Class => {
                let mut branches = vec![format!(
                    "{} {} {} .\n",
                    s,
                    ty,
                    iri(&self.profile.class_iri)
                )];
                if let Some(sub) = self.profile.subclass_iri.as_deref() {
                    let x = var(&fresh.fresh());
                    branches.push(format!("{} {} {} .\n", s, iri(sub), x));
                    branches.push(format!("{} {} {} .\n", x, iri(sub), s));
                }
                union_text(&branches)
            }
            Mode::Property => {
                let mut branches = vec![format!(
                    "{} {} {} .\n",
                    s,
                    ty,
                    iri(self.property_type())
                )];
                if let Some(sub) = self.profile.sub_property_iri.as_deref() {
                    let x = var(&fresh.fresh());
                    branches.push(format!("{} {} {} .\n", s, iri(sub), x));
                    branches.push(format!("{} {} {} .\n", x, iri(sub), s));
                }
                union_text(&branches)
            }
            Mode::Instance => {
                let t = var(&fresh.fresh());
                format!("{} {} {} .\n", s, ty, t)
            }
            Mode::Item => {
                let p = var(&fresh.fresh());
                let o = var(&fresh.fresh());
                format!("{} {} {} .\n", s, p, o)
            }
        };
        if bound {
            writeln!(out, "FILTER EXISTS {{\n{}}}", group).unwrap();
        } else {
            out.push_str(&group);
        }
        if mode == Mode::Instance {
            writeln!(
                out,
                "FILTER NOT EXISTS {{ {} {} {} }}",
                s,
                ty,
                iri(&self.profile.class_iri)
            )
            .unwrap();
            writeln!(
                out,
                "FILTER NOT EXISTS {{ {} {} {} }}",
                s,
                ty,
                iri(self.property_type())
            )
            .unwrap();
        }
    }

    /// Write the navigation patterns for `filter`.
    ///
    /// Returns `true` when the mode restriction was written as part of the
    /// navigation (roots), so the caller must not add it again.
    pub(crate) fn write(
        &self,
        filter: &HierarchyFilter,
        bound: bool,
        fresh: &mut FreshVars,
        out: &mut String,
    ) -> bool {
        if *filter == HierarchyFilter::Roots {
            self.write_roots(bound, fresh, out);
            return true;
        }
        let Some(sub) = self.edge() else {
            tracing::debug!(mode = %self.mode, "no hierarchy edge configured; navigation is empty");
            out.push_str("FILTER(false)\n");
            return false;
        };
        let s = var(vars::SUBJECT);
        let sub = iri(sub);
        let ty = iri(&self.profile.type_iri);
        let anchor = filter.anchor().map(iri).unwrap_or_default();
        match (filter, self.follows_type_edge()) {
            (HierarchyFilter::Children(_), false) => {
                writeln!(out, "{} {} {} .", s, sub, anchor).unwrap();
            }
            (HierarchyFilter::Parents(_), false) => {
                writeln!(out, "{} {} {} .", anchor, sub, s).unwrap();
            }
            (HierarchyFilter::Descendants(_), false) => {
                writeln!(out, "{} {}* {} .", s, sub, anchor).unwrap();
                writeln!(out, "FILTER({} != {})", s, anchor).unwrap();
            }
            (HierarchyFilter::Ancestors(_), false) => {
                writeln!(out, "{} {}* {} .", anchor, sub, s).unwrap();
                writeln!(out, "FILTER({} != {})", s, anchor).unwrap();
            }
            (HierarchyFilter::Children(_), true) => {
                out.push_str(&union_text(&[
                    format!("{} {} {} .\n", s, sub, anchor),
                    format!("{} {} {} .\n", s, ty, anchor),
                ]));
            }
            (HierarchyFilter::Parents(_), true) => {
                out.push_str(&union_text(&[
                    format!("{} {} {} .\n", anchor, sub, s),
                    format!("{} {} {} .\n", anchor, ty, s),
                ]));
            }
            (HierarchyFilter::Descendants(_), true) => {
                writeln!(out, "{} ({}|{})/{}* {} .", s, sub, ty, sub, anchor).unwrap();
                writeln!(out, "FILTER({} != {})", s, anchor).unwrap();
            }
            (HierarchyFilter::Ancestors(_), true) => {
                writeln!(out, "{} ({}|{})/{}* {} .", anchor, ty, sub, sub, s).unwrap();
                writeln!(out, "FILTER({} != {})", s, anchor).unwrap();
            }
            (HierarchyFilter::Roots, _) => {}
        }
        false
    }

    fn write_roots(&self, bound: bool, fresh: &mut FreshVars, out: &mut String) {
        let s = var(vars::SUBJECT);
        if !self.profile.root_concepts.is_empty() {
            let values: Vec<String> = self.profile.root_concepts.iter().map(|r| iri(r)).collect();
            writeln!(out, "VALUES {} {{ {} }}", s, values.join(" ")).unwrap();
            self.write_restriction(self.mode, true, fresh, out);
            return;
        }
        // computed ITEM roots are class roots
        let members = match self.mode {
            Mode::Item => Mode::Class,
            other => other,
        };
        self.write_restriction(members, bound, fresh, out);
        // every instance has a type, so only the subclass edge marks a parent
        let Some(sub) = self.edge() else {
            return;
        };
        let p = var(&fresh.fresh());
        writeln!(
            out,
            "FILTER NOT EXISTS {{ {} {} {} . FILTER({} != {}) }}",
            s,
            iri(sub),
            p,
            p,
            s
        )
        .unwrap();
    }
}

fn union_text(branches: &[String]) -> String {
    let mut out = String::new();
    crate::label::write_union(&mut out, branches);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: &str = "http://example.org/kb#x";

    fn render(profile: &DialectProfile, mode: Mode, filter: HierarchyFilter) -> String {
        let mut out = String::new();
        HierarchyNavigator::new(profile, mode).write(&filter, false, &mut FreshVars::new(), &mut out);
        out
    }

    #[test]
    fn class_children_single_hop() {
        let out = render(&DialectProfile::rdfs(), Mode::Class, HierarchyFilter::Children(X.into()));
        assert_eq!(
            out,
            "?s <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/kb#x> .\n"
        );
    }

    #[test]
    fn class_descendants_exclude_anchor() {
        let out = render(
            &DialectProfile::rdfs(),
            Mode::Class,
            HierarchyFilter::Descendants(X.into()),
        );
        assert!(out.contains("rdf-schema#subClassOf>* <http://example.org/kb#x> ."));
        assert!(out.ends_with("FILTER(?s != <http://example.org/kb#x>)\n"));
    }

    #[test]
    fn property_mode_uses_sub_property_edge() {
        let out = render(
            &DialectProfile::rdfs(),
            Mode::Property,
            HierarchyFilter::Parents(X.into()),
        );
        assert!(out.contains("subPropertyOf"));
        assert!(out.starts_with("<http://example.org/kb#x>"));
    }

    #[test]
    fn instance_navigation_follows_type_edge() {
        let out = render(
            &DialectProfile::rdfs(),
            Mode::Instance,
            HierarchyFilter::Children(X.into()),
        );
        assert!(out.contains("UNION"));
        assert!(out.contains("22-rdf-syntax-ns#type> <http://example.org/kb#x>"));
    }

    #[test]
    fn instance_ancestors_start_with_type_or_sub() {
        let out = render(
            &DialectProfile::rdfs(),
            Mode::Instance,
            HierarchyFilter::Ancestors(X.into()),
        );
        assert!(out.starts_with(
            "<http://example.org/kb#x> (<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>|"
        ));
    }

    #[test]
    fn missing_edge_navigates_nowhere() {
        let mut profile = DialectProfile::rdfs();
        profile.subclass_iri = None;
        let out = render(&profile, Mode::Class, HierarchyFilter::Children(X.into()));
        assert_eq!(out, "FILTER(false)\n");
    }

    #[test]
    fn explicit_roots_are_values() {
        let mut profile = DialectProfile::rdfs();
        profile.root_concepts = vec![X.to_string()];
        let out = render(&profile, Mode::Class, HierarchyFilter::Roots);
        assert!(out.starts_with("VALUES ?s { <http://example.org/kb#x> }\nFILTER EXISTS {\n"));
        assert!(!out.contains("FILTER NOT EXISTS"));
    }

    #[test]
    fn computed_roots_exclude_nodes_with_parents() {
        let out = render(&DialectProfile::rdfs(), Mode::Class, HierarchyFilter::Roots);
        assert!(out.starts_with("{\n?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type>"));
        assert!(out.ends_with(
            "FILTER NOT EXISTS { ?s <http://www.w3.org/2000/01/rdf-schema#subClassOf> ?_v1 . FILTER(?_v1 != ?s) }\n"
        ));
    }

    #[test]
    fn computed_instance_roots_ignore_type_edge() {
        let out = render(&DialectProfile::rdfs(), Mode::Instance, HierarchyFilter::Roots);
        let (membership, no_parent) = out.rsplit_once("FILTER NOT EXISTS").unwrap();
        assert!(membership.contains("22-rdf-syntax-ns#type>"));
        assert!(no_parent.starts_with(" { ?s <http://www.w3.org/2000/01/rdf-schema#subClassOf> ?_v"));
        assert!(!no_parent.contains("22-rdf-syntax-ns#type>"));
    }

    #[test]
    fn computed_roots_without_edge_are_all_members() {
        let mut profile = DialectProfile::rdfs();
        profile.subclass_iri = None;
        let out = render(&profile, Mode::Class, HierarchyFilter::Roots);
        assert_eq!(
            out,
            "?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2000/01/rdf-schema#Class> .\n"
        );
    }

    #[test]
    fn restriction_scope() {
        let profile = DialectProfile::rdfs();
        let nav = HierarchyNavigator::new(&profile, Mode::Instance);
        assert!(nav.restricts(None));
        assert!(nav.restricts(Some(&HierarchyFilter::Children(X.into()))));
        assert!(!nav.restricts(Some(&HierarchyFilter::Parents(X.into()))));
        let nav = HierarchyNavigator::new(&profile, Mode::Item);
        assert!(!nav.restricts(Some(&HierarchyFilter::Descendants(X.into()))));
    }

    #[test]
    fn bound_restriction_is_filter_exists() {
        let profile = DialectProfile::rdfs();
        let mut out = String::new();
        HierarchyNavigator::new(&profile, Mode::Item).write_restriction(
            Mode::Item,
            true,
            &mut FreshVars::new(),
            &mut out,
        );
        assert_eq!(out, "FILTER EXISTS {\n?s ?_v0 ?_v1 .\n}\n");
    }
}
