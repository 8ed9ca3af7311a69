//! Shows a plan with several chained steps, each action's preconditions
//! supplied entirely by an earlier action's effects.

use regress_planner::prelude::*;

fn main() {
    env_logger::init();

    let has_wood = ConditionClass::define("has_wood", 1, |objs: &[EntityHandle]| {
        Ok(objs[0].get("has_wood"))
    });
    let has_fire = ConditionClass::define("has_fire", 1, |objs: &[EntityHandle]| {
        Ok(objs[0].get("has_fire"))
    });
    let has_cooked_meat = ConditionClass::define("has_cooked_meat", 1, |objs: &[EntityHandle]| {
        Ok(objs[0].get("has_cooked_meat"))
    });
    let is_hungry = ConditionClass::define("is_hungry", 1, |objs: &[EntityHandle]| {
        Ok(objs[0].get("hungry"))
    });

    let gather_wood = ActionClass::new("gather_wood")
        .with_precondition(has_wood.clone(), ACTOR_ROLE, false)
        .with_effect(has_wood.clone(), ACTOR_ROLE, true)
        .with_apply(|actor, _| {
            actor.set("has_wood", true);
            Ok(())
        });

    let light_fire = ActionClass::new("light_fire")
        .with_precondition(has_wood.clone(), ACTOR_ROLE, true)
        .with_effect(has_fire.clone(), ACTOR_ROLE, true)
        .with_effect(has_wood, ACTOR_ROLE, false)
        .with_apply(|actor, _| {
            actor.set("has_fire", true);
            actor.set("has_wood", false);
            Ok(())
        });

    let cook_meat = ActionClass::new("cook_meat")
        .with_precondition(has_fire.clone(), ACTOR_ROLE, true)
        .with_effect(has_cooked_meat.clone(), ACTOR_ROLE, true)
        .with_apply(|actor, _| {
            actor.set("has_cooked_meat", true);
            Ok(())
        });

    let eat = ActionClass::new("eat")
        .with_precondition(has_cooked_meat.clone(), ACTOR_ROLE, true)
        .with_effect(is_hungry.clone(), ACTOR_ROLE, false)
        .with_effect(has_cooked_meat, ACTOR_ROLE, false)
        .with_apply(|actor, _| {
            actor.set("hungry", false);
            actor.set("has_cooked_meat", false);
            Ok(())
        });

    let survivor = EntityHandle::new(1, "survivor").with_attr("hungry", true);
    let bound = is_hungry.bind(vec![survivor.clone()]).unwrap();
    let goal = Goal::new("stop being hungry", bound, false);

    let config = PlannerConfig { max_search_depth: 4 };
    match select_plan(
        &survivor,
        &goal,
        &[gather_wood, light_fire, cook_meat, eat],
        &[survivor.clone()],
        &config,
    ) {
        Ok(plan) => {
            for (actor, action, bindings) in &plan {
                println!("{actor} performs {} with {bindings:?}", action.name());
            }
        },
        Err(err) => eprintln!("no plan found: {err}"),
    }
}
