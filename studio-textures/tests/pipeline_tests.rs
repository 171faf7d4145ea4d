//! Texture pipeline integration tests
//!
//! End-to-end runs of `TexturePipeline` over an in-memory SQLite catalog with
//! mocked semantic matcher and image service.

mod helpers;

use helpers::{
    count_rows, insert_texture, memory_catalog, test_pipeline, usage_count, CountingMatcher,
    FixedScorer, RecordingImages,
};
use std::sync::Arc;
use studio_textures::db::{textures, CatalogStore, SqliteCatalog};
use studio_textures::models::{BilingualName, PriceTier, TextureGenerationOptions};
use studio_textures::services::{
    SemanticDecision, StyleTextureJob, TextureProposal, AI_LINK_CONFIDENCE_THRESHOLD,
    HEURISTIC_CONFIDENCE_THRESHOLD,
};
use studio_textures::PipelineError;
use uuid::Uuid;

const SCENARIO_GUIDANCE: &str = "brushed oak paneling, matte wall paint, polished marble flooring";

fn no_images() -> TextureGenerationOptions {
    TextureGenerationOptions {
        generate_images: false,
        ..Default::default()
    }
}

/// (English name, Hebrew name, finish, category slug) for each scenario material
const SCENARIO_TEXTURES: [(&str, &str, &str, &str); 3] = [
    ("Oak", "אלון", "brushed", "wood-finishes"),
    ("Paint", "צבע", "matte", "wall-finishes"),
    ("Marble", "שיש", "polished", "stone-finishes"),
];

/// Matcher that always proposes a new texture named after the descriptor
fn proposing_own_name() -> CountingMatcher {
    CountingMatcher::new(|request| {
        Ok(SemanticDecision::Created {
            proposal: TextureProposal {
                name: BilingualName::new(request.descriptor.candidate_name.clone(), ""),
                finish: None,
                sheen: None,
                base_color: None,
                category_id: None,
            },
            confidence: 0.9,
            reasoning: "no close match in the catalog".to_string(),
        })
    })
}

async fn assert_scenario_textures(catalog: &SqliteCatalog, ids: &[Uuid]) {
    assert_eq!(ids.len(), SCENARIO_TEXTURES.len());
    for (id, (en, he, finish, slug)) in ids.iter().zip(SCENARIO_TEXTURES) {
        let texture = textures::load_texture(catalog.pool(), *id).await.unwrap().unwrap();
        assert_eq!(texture.name, BilingualName::new(en, he));
        assert_eq!(texture.finish, finish, "finish of {}", en);
        assert_eq!(texture.usage_count, 1, "usage of {}", en);
        assert!(texture.is_abstract);

        let category = catalog.find_category_by_slug(slug).await.unwrap().unwrap();
        assert_eq!(
            textures::load_texture_category_ids(catalog.pool(), *id).await.unwrap(),
            vec![category.id],
            "category of {}",
            en
        );
    }
}

async fn run_scenario_then_reprocess(matcher: Arc<CountingMatcher>) {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let pipeline = test_pipeline(&catalog, matcher.clone()).build();
    let style_id = Uuid::new_v4();

    let first = pipeline
        .generate_textures_for_style(style_id, SCENARIO_GUIDANCE, PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(matcher.calls(), 3);
    assert_eq!(count_rows(&pool, "textures").await, 3);
    assert_eq!(count_rows(&pool, "texture_categories").await, 3);
    assert_eq!(count_rows(&pool, "style_textures").await, 3);
    assert_scenario_textures(&catalog, &first).await;

    // Reprocessing the same guidance: every descriptor is an exact match
    let report = pipeline
        .generate_style_report(style_id, SCENARIO_GUIDANCE, PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(report.texture_ids, first);
    assert_eq!(report.matched, 3);
    assert_eq!(report.created, 0);
    assert_eq!(report.already_linked, 3);
    assert_eq!(matcher.calls(), 3, "exact matches must not call the AI");
    assert_eq!(count_rows(&pool, "textures").await, 3);
    assert_eq!(count_rows(&pool, "texture_categories").await, 3);
    assert_eq!(count_rows(&pool, "style_textures").await, 3);
    for id in &first {
        assert_eq!(usage_count(&pool, *id).await, 1);
    }
}

#[tokio::test]
async fn test_three_material_scenario_with_ai_proposals() {
    run_scenario_then_reprocess(Arc::new(proposing_own_name())).await;
}

#[tokio::test]
async fn test_three_material_scenario_with_keyword_fallback() {
    run_scenario_then_reprocess(Arc::new(CountingMatcher::unclear())).await;
}

#[tokio::test]
async fn test_ai_proposals_are_tagged_with_origin() {
    let catalog = memory_catalog(true).await;
    let pipeline = test_pipeline(&catalog, Arc::new(proposing_own_name())).build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), SCENARIO_GUIDANCE, PriceTier::Regular, &no_images())
        .await
        .unwrap();

    for id in &ids {
        let texture = textures::load_texture(catalog.pool(), *id).await.unwrap().unwrap();
        assert!(texture.tags.contains(&"ai-proposal".to_string()));
        assert_eq!(
            texture.description.as_deref(),
            Some("AI proposal: no close match in the catalog")
        );
    }
}

#[tokio::test]
async fn test_exact_match_short_circuits_ai() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let walnut = insert_texture(&pool, "Walnut", "אגוז", "wood-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::failing());
    let pipeline = test_pipeline(&catalog, matcher.clone()).build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "oiled walnut shelving", PriceTier::Luxury, &no_images())
        .await
        .unwrap();

    assert_eq!(ids, vec![walnut]);
    assert_eq!(matcher.calls(), 0);
    assert_eq!(count_rows(&pool, "textures").await, 1);
    assert_eq!(usage_count(&pool, walnut).await, 1);
}

#[tokio::test]
async fn test_heuristic_threshold_links_without_ai() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let walnut = insert_texture(&pool, "Walnut", "אגוז", "wood-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::failing());
    let pipeline = test_pipeline(&catalog, matcher.clone())
        .scorer(Arc::new(FixedScorer(HEURISTIC_CONFIDENCE_THRESHOLD)))
        .build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "brushed oak paneling", PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(ids, vec![walnut]);
    assert_eq!(matcher.calls(), 0);
    assert_eq!(count_rows(&pool, "textures").await, 1);
}

#[tokio::test]
async fn test_heuristic_below_threshold_consults_ai() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let walnut = insert_texture(&pool, "Walnut", "אגוז", "wood-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::failing());
    let pipeline = test_pipeline(&catalog, matcher.clone())
        .scorer(Arc::new(FixedScorer(HEURISTIC_CONFIDENCE_THRESHOLD - 0.01)))
        .build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "brushed oak paneling", PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(matcher.calls(), 1);
    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], walnut);
    assert_eq!(count_rows(&pool, "textures").await, 2);
}

#[tokio::test]
async fn test_default_scorer_links_oak_to_natural_oak() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let oak = insert_texture(&pool, "Natural Oak", "אלון טבעי", "wood-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::failing());
    let pipeline = test_pipeline(&catalog, matcher.clone()).build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "natural oak flooring", PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(ids, vec![oak]);
    assert_eq!(matcher.calls(), 0);
}

#[tokio::test]
async fn test_shared_prefix_does_not_link_different_stone() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let quartzite = insert_texture(&pool, "Quartzite", "קוורציט", "stone-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::failing());
    let pipeline = test_pipeline(&catalog, matcher.clone()).build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "polished quartz countertops", PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], quartzite);
    assert_eq!(matcher.calls(), 1);
    let created = textures::load_texture(&pool, ids[0]).await.unwrap().unwrap();
    assert_eq!(created.name, BilingualName::new("Quartz", "קוורץ"));
}

#[tokio::test]
async fn test_budget_cap_processes_first_five() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let matcher = Arc::new(CountingMatcher::unclear());
    let pipeline = test_pipeline(&catalog, matcher.clone())
        .scorer(Arc::new(FixedScorer(0.0)))
        .build();

    let guidance = "oak floors, walnut desk, marble counters, brass handles, velvet sofa, \
                    linen curtains, ceramic backsplash, glass partitions, copper pendants";
    let report = pipeline
        .generate_style_report(Uuid::new_v4(), guidance, PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(report.descriptors_found, 9);
    assert_eq!(report.descriptors_processed, 5);
    assert_eq!(report.texture_ids.len(), 5);
    assert_eq!(matcher.calls(), 5);
    assert_eq!(count_rows(&pool, "style_textures").await, 5);

    let mut names = Vec::new();
    for id in &report.texture_ids {
        names.push(textures::load_texture(&pool, *id).await.unwrap().unwrap().name.en);
    }
    assert_eq!(names, vec!["Oak", "Walnut", "Marble", "Brass", "Velvet"]);
}

#[tokio::test]
async fn test_ai_failure_falls_back_for_every_descriptor() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let matcher = Arc::new(CountingMatcher::failing());
    let pipeline = test_pipeline(&catalog, matcher.clone()).build();

    let report = pipeline
        .generate_style_report(Uuid::new_v4(), SCENARIO_GUIDANCE, PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(report.texture_ids.len(), 3);
    assert_eq!(report.created, 3);
    assert_eq!(report.skipped, 0);
    assert_eq!(matcher.calls(), 3);
    assert_eq!(count_rows(&pool, "texture_categories").await, 3);
}

#[tokio::test]
async fn test_confident_ai_link_reuses_texture() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let travertine = insert_texture(&pool, "Roman Travertine", "טרוורטין רומי", "stone-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::new(move |request| {
        assert!(request.context.contains_texture(travertine));
        Ok(SemanticDecision::Linked {
            target_id: travertine,
            confidence: AI_LINK_CONFIDENCE_THRESHOLD,
            reasoning: "travertine is a limestone".to_string(),
        })
    }));
    let pipeline = test_pipeline(&catalog, matcher.clone())
        .scorer(Arc::new(FixedScorer(0.0)))
        .build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "honed limestone floors", PriceTier::Luxury, &no_images())
        .await
        .unwrap();

    assert_eq!(ids, vec![travertine]);
    assert_eq!(matcher.calls(), 1);
    assert_eq!(count_rows(&pool, "textures").await, 1);
}

#[tokio::test]
async fn test_low_confidence_ai_link_falls_back() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let travertine = insert_texture(&pool, "Roman Travertine", "טרוורטין רומי", "stone-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::new(move |_| {
        Ok(SemanticDecision::Linked {
            target_id: travertine,
            confidence: AI_LINK_CONFIDENCE_THRESHOLD - 0.1,
            reasoning: "maybe".to_string(),
        })
    }));
    let pipeline = test_pipeline(&catalog, matcher)
        .scorer(Arc::new(FixedScorer(0.0)))
        .build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "honed limestone floors", PriceTier::Luxury, &no_images())
        .await
        .unwrap();

    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], travertine);
    let created = textures::load_texture(&pool, ids[0]).await.unwrap().unwrap();
    assert_eq!(created.name, BilingualName::new("Limestone", "אבן גיר"));
    assert_eq!(created.finish, "honed");
}

#[tokio::test]
async fn test_ai_proposal_creates_texture_with_image() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let metal = catalog.find_category_by_slug("metal-finishes").await.unwrap().unwrap();
    let metal_id = metal.id;
    let matcher = Arc::new(CountingMatcher::new(move |_| {
        Ok(SemanticDecision::Created {
            proposal: TextureProposal {
                name: BilingualName::new("Aged Brass", "פליז מיושן"),
                finish: Some("patinated".to_string()),
                sheen: None,
                base_color: Some("#b5a642".to_string()),
                category_id: Some(metal_id),
            },
            confidence: 0.9,
            reasoning: "warm aged metal".to_string(),
        })
    }));
    let images = Arc::new(RecordingImages::default());
    let pipeline = test_pipeline(&catalog, matcher)
        .image_generator(images.clone())
        .build();

    let report = pipeline
        .generate_style_report(
            Uuid::new_v4(),
            "patinated brass hardware",
            PriceTier::Luxury,
            &TextureGenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.created, 1);
    let texture = textures::load_texture(&pool, report.texture_ids[0]).await.unwrap().unwrap();
    assert_eq!(texture.name.en, "Aged Brass");
    assert_eq!(texture.sheen.as_deref(), Some("low"));
    assert_eq!(texture.image_url.as_deref(), Some("https://images.test/aged-brass.png"));
    assert!(texture.tags.contains(&"LUXURY".to_string()));
    assert_eq!(
        textures::load_texture_category_ids(&pool, texture.id).await.unwrap(),
        vec![metal.id]
    );

    let requests = images.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, BilingualName::new("Aged Brass", "פליז מיושן"));
    assert_eq!(requests[0].price_tier, PriceTier::Luxury);
    assert_eq!(requests[0].entity_type, "texture");
}

#[tokio::test]
async fn test_ai_proposal_matching_existing_name_is_not_duplicated() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let smoked = insert_texture(&pool, "Smoked Oak", "אלון מעושן", "wood-finishes", None).await;
    let matcher = Arc::new(CountingMatcher::new(|_| {
        Ok(SemanticDecision::Created {
            proposal: TextureProposal {
                name: BilingualName::new("Smoked Oak", ""),
                finish: None,
                sheen: None,
                base_color: None,
                category_id: None,
            },
            confidence: 0.8,
            reasoning: "dark oak".to_string(),
        })
    }));
    let pipeline = test_pipeline(&catalog, matcher)
        .scorer(Arc::new(FixedScorer(0.0)))
        .build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "dark oak veneer", PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert_eq!(ids, vec![smoked]);
    assert_eq!(count_rows(&pool, "textures").await, 1);
}

#[tokio::test]
async fn test_images_skipped_when_disabled_in_options() {
    let catalog = memory_catalog(true).await;
    let images = Arc::new(RecordingImages::default());
    let pipeline = test_pipeline(&catalog, Arc::new(CountingMatcher::failing()))
        .image_generator(images.clone())
        .build();

    pipeline
        .generate_textures_for_style(Uuid::new_v4(), SCENARIO_GUIDANCE, PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert!(images.requests().is_empty());
}

#[tokio::test]
async fn test_created_texture_visible_in_next_context() {
    let catalog = memory_catalog(true).await;
    let pipeline = test_pipeline(&catalog, Arc::new(CountingMatcher::failing())).build();

    let before = pipeline.context_cache().get_context(None).await.unwrap();
    assert!(before.textures.is_empty());

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "linen drapery", PriceTier::Regular, &no_images())
        .await
        .unwrap();

    // TTL has not elapsed on the manual clock; only invalidation can expose the new texture
    let after = pipeline.context_cache().get_context(None).await.unwrap();
    assert!(after.contains_texture(ids[0]));
}

#[tokio::test]
async fn test_empty_catalog_aborts_style() {
    let catalog = memory_catalog(false).await;
    let pool = catalog.pool().clone();
    let pipeline = test_pipeline(&catalog, Arc::new(CountingMatcher::failing())).build();

    let err = pipeline
        .generate_textures_for_style(Uuid::new_v4(), SCENARIO_GUIDANCE, PriceTier::Regular, &no_images())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::NoCategories));
    assert_eq!(count_rows(&pool, "textures").await, 0);
    assert_eq!(count_rows(&pool, "style_textures").await, 0);
}

#[tokio::test]
async fn test_batch_continues_after_aborted_style() {
    let catalog = memory_catalog(false).await;
    let pipeline = test_pipeline(&catalog, Arc::new(CountingMatcher::failing())).build();

    let jobs: Vec<StyleTextureJob> = serde_json::from_value(serde_json::json!([
        { "style_id": Uuid::new_v4(), "guidance": "oak flooring", "generate_images": false },
        { "style_id": Uuid::new_v4(), "guidance": "", "generate_images": false },
    ]))
    .unwrap();

    let summaries = pipeline.generate_textures_for_styles(&jobs).await;

    assert_eq!(summaries.len(), 2);
    assert!(summaries[0].error.is_some());
    assert_eq!(summaries[0].style_id, jobs[0].style_id);
    assert!(summaries[1].error.is_none());
    assert_eq!(summaries[1].linked, 0);
}

#[tokio::test]
async fn test_aborted_style_summary_keeps_earlier_links() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let oak = insert_texture(&pool, "Oak", "אלון", "wood-finishes", None).await;
    sqlx::query("DELETE FROM material_categories")
        .execute(&pool)
        .await
        .unwrap();
    let pipeline = test_pipeline(&catalog, Arc::new(CountingMatcher::failing())).build();

    let jobs: Vec<StyleTextureJob> = serde_json::from_value(serde_json::json!([
        { "style_id": Uuid::new_v4(), "guidance": "oak shelving, marble counters", "generate_images": false },
    ]))
    .unwrap();

    let summaries = pipeline.generate_textures_for_styles(&jobs).await;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].linked, 1);
    assert_eq!(summaries[0].matched, 1);
    assert_eq!(summaries[0].created, 0);
    assert!(summaries[0].error.is_some());
    assert_eq!(count_rows(&pool, "style_textures").await, 1);
    assert_eq!(usage_count(&pool, oak).await, 1);

    // The single-style entry point still reports the abort as an error
    let err = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "oak shelving, marble counters", PriceTier::Regular, &no_images())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NoCategories));
}

#[tokio::test]
async fn test_empty_guidance_links_nothing() {
    let catalog = memory_catalog(true).await;
    let matcher = Arc::new(CountingMatcher::failing());
    let pipeline = test_pipeline(&catalog, matcher.clone()).build();

    let ids = pipeline
        .generate_textures_for_style(Uuid::new_v4(), "with that, and the", PriceTier::Regular, &no_images())
        .await
        .unwrap();

    assert!(ids.is_empty());
    assert_eq!(matcher.calls(), 0);
}

#[tokio::test]
async fn test_unlink_decrements_usage() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let oak = insert_texture(&pool, "Oak", "אלון", "wood-finishes", None).await;
    let pipeline = test_pipeline(&catalog, Arc::new(CountingMatcher::failing())).build();
    let style_a = Uuid::new_v4();
    let style_b = Uuid::new_v4();

    for style in [style_a, style_b] {
        pipeline
            .generate_textures_for_style(style, "oak shelving", PriceTier::Regular, &no_images())
            .await
            .unwrap();
    }
    assert_eq!(usage_count(&pool, oak).await, 2);

    assert_eq!(pipeline.unlink(style_a, oak).await.unwrap(), 1);
    assert_eq!(usage_count(&pool, oak).await, 1);

    assert_eq!(pipeline.unlink(style_a, oak).await.unwrap(), 0);
    assert_eq!(usage_count(&pool, oak).await, 1);
}

#[tokio::test]
async fn test_private_texture_not_matched_for_other_organization() {
    let catalog = memory_catalog(true).await;
    let pool = catalog.pool().clone();
    let org_a = Uuid::new_v4();
    let private = insert_texture(&pool, "Oak", "אלון", "wood-finishes", Some(org_a)).await;
    let pipeline = test_pipeline(&catalog, Arc::new(CountingMatcher::failing()))
        .scorer(Arc::new(FixedScorer(0.0)))
        .build();

    let own = pipeline
        .generate_textures_for_style(
            Uuid::new_v4(),
            "oak shelving",
            PriceTier::Regular,
            &TextureGenerationOptions {
                organization_id: Some(org_a),
                ..no_images()
            },
        )
        .await
        .unwrap();
    assert_eq!(own, vec![private]);

    let other = pipeline
        .generate_textures_for_style(
            Uuid::new_v4(),
            "oak shelving",
            PriceTier::Regular,
            &TextureGenerationOptions {
                organization_id: Some(Uuid::new_v4()),
                ..no_images()
            },
        )
        .await
        .unwrap();
    assert_ne!(other, vec![private]);
    assert_eq!(count_rows(&pool, "textures").await, 2);
}
