use regress_planner::prelude::*;

fn main() {
    env_logger::init();

    let hungry = ConditionClass::define("is_hungry", 1, |objs: &[EntityHandle]| {
        Ok(objs[0].get("hungry"))
    });
    let has_food = ConditionClass::define("has_food", 1, |objs: &[EntityHandle]| {
        Ok(objs[0].get("has_food"))
    });

    let buy_food = ActionClass::new("buy_food")
        .with_precondition(has_food.clone(), ACTOR_ROLE, false)
        .with_effect(has_food.clone(), ACTOR_ROLE, true)
        .with_apply(|actor, _| {
            actor.set("has_food", true);
            Ok(())
        });

    let eat = ActionClass::new("eat")
        .with_precondition(has_food.clone(), ACTOR_ROLE, true)
        .with_effect(hungry.clone(), ACTOR_ROLE, false)
        .with_effect(has_food, ACTOR_ROLE, false)
        .with_apply(|actor, _| {
            actor.set("hungry", false);
            actor.set("has_food", false);
            Ok(())
        });

    let player = EntityHandle::new(1, "player").with_attr("hungry", true);
    let bound = hungry.bind(vec![player.clone()]).unwrap();
    let goal = Goal::new("stop being hungry", bound, false);

    match select_plan_default(&player, &goal, &[buy_food, eat], &[player.clone()]) {
        Ok(plan) => {
            for (actor, action, bindings) in &plan {
                println!("{actor} performs {} with {bindings:?}", action.name());
            }
        },
        Err(err) => eprintln!("no plan found: {err}"),
    }
}
