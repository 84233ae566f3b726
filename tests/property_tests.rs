#[cfg(test)]
mod property_tests {
    use std::collections::HashSet;

    use metis::agent::DdpgAgentBuilder;
    use metis::network::{PolicyNetwork, QNetwork};
    use metis::noise::OrnsteinUhlenbeck;
    use metis::optimizer::{OptimizerWrapper, SGD};
    use metis::replay_buffer::{ReplayBuffer, Transition};
    use ndarray::{array, Array1};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn transition(tag: f32) -> Transition {
        Transition {
            state: array![tag],
            action: array![tag],
            reward: tag,
            terminal: false,
            next_state: array![tag],
        }
    }

    proptest! {
        #[test]
        fn test_replay_len_never_exceeds_capacity(
            capacity in 1usize..32,
            pushes in 0usize..100
        ) {
            let mut buffer = ReplayBuffer::new(capacity);
            for i in 0..pushes {
                buffer.push(transition(i as f32));
            }

            prop_assert_eq!(buffer.len(), pushes.min(capacity));
            if pushes > 0 {
                // Eviction is strictly first-in first-out.
                let expected_oldest = pushes.saturating_sub(capacity) as f32;
                prop_assert_eq!(buffer.oldest().unwrap().reward, expected_oldest);
            }
        }

        #[test]
        fn test_replay_samples_are_distinct(
            batch in 1usize..=16,
            extra in 0usize..32,
            seed in any::<u64>()
        ) {
            let available = batch + extra;
            let mut buffer = ReplayBuffer::new(64);
            for i in 0..available {
                buffer.push(transition(i as f32));
            }

            let mut rng = StdRng::seed_from_u64(seed);
            let sampled = buffer.sample(&mut rng, batch).unwrap();
            let rewards: HashSet<u32> = sampled.iter().map(|t| t.reward as u32).collect();
            prop_assert_eq!(rewards.len(), batch);
        }

        #[test]
        fn test_explored_actions_stay_in_range(
            low in -10.0f32..0.0,
            width in 0.1f32..10.0,
            head_bias in -20.0f32..20.0,
            seed in any::<u64>()
        ) {
            let high = low + width;
            let mut agent = DdpgAgentBuilder::new(2, 1)
                .hidden_size(4)
                .action_range(low, high)
                .seed(seed)
                .build()
                .unwrap();

            // Pin the actor head so the raw action can sit far outside the
            // range in either direction.
            agent.actor.layers[2].weights.fill(0.0);
            agent.actor.layers[2].biases.fill(head_bias);

            let state = array![0.2f32, -0.2];
            for _ in 0..5 {
                let action = agent.select_action(state.view(), true).unwrap();
                prop_assert!(action[0] >= low && action[0] <= high);
            }
        }

        #[test]
        fn test_ou_without_dynamics_stays_at_zero(
            mu in -5.0f32..5.0,
            steps in 1usize..50,
            seed in any::<u64>()
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut noise = OrnsteinUhlenbeck::with_params(3, mu, 0.0, 0.0);
            for _ in 0..steps {
                let sample = noise.sample(&mut rng);
                prop_assert!(sample.iter().all(|&x| x == 0.0));
            }
        }

        #[test]
        fn test_ou_contracts_toward_mu(
            mu in -2.0f32..2.0,
            theta in 0.01f32..1.0,
            steps in 1usize..30,
            seed in any::<u64>()
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut noise = OrnsteinUhlenbeck::with_params(1, mu, theta, 0.0);

            let mut previous_gap = mu.abs();
            for _ in 0..steps {
                let sample = noise.sample(&mut rng);
                let gap = (mu - sample[0]).abs();
                prop_assert!(gap <= previous_gap + 1e-6);
                previous_gap = gap;
            }
        }

        #[test]
        fn test_tracking_endpoints(
            seed_a in any::<u64>(),
            seed_b in any::<u64>()
        ) {
            let mut rng_a = StdRng::seed_from_u64(seed_a);
            let mut rng_b = StdRng::seed_from_u64(seed_b);
            let optimizer = OptimizerWrapper::SGD(SGD::new());
            let source = PolicyNetwork::new(3, 2, 4, optimizer.clone(), &mut rng_a);
            let start = PolicyNetwork::new(3, 2, 4, optimizer, &mut rng_b);

            let mut frozen = start.clone();
            frozen.track(&source, 0.0);
            for (after, original) in frozen.layers.iter().zip(&start.layers) {
                prop_assert_eq!(&after.weights, &original.weights);
                prop_assert_eq!(&after.biases, &original.biases);
            }

            let mut copied = start.clone();
            copied.track(&source, 1.0);
            for (after, from) in copied.layers.iter().zip(&source.layers) {
                prop_assert_eq!(&after.weights, &from.weights);
                prop_assert_eq!(&after.biases, &from.biases);
            }
        }

        #[test]
        fn test_network_widths_follow_configuration(
            state_dim in 1usize..8,
            action_dim in 1usize..4,
            hidden in 1usize..16,
            seed in any::<u64>()
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let optimizer = OptimizerWrapper::SGD(SGD::new());
            let mut policy =
                PolicyNetwork::new(state_dim, action_dim, hidden, optimizer.clone(), &mut rng);
            let state = Array1::zeros(state_dim);
            prop_assert_eq!(policy.forward(state.view()).len(), action_dim);

            let mut critic = QNetwork::new(state_dim, action_dim, hidden, optimizer, &mut rng);
            let action = Array1::zeros(action_dim);
            prop_assert!(critic.forward(state.view(), action.view()).is_finite());
        }

        #[test]
        fn test_q_values_stay_finite(
            entries in prop::collection::vec(-100.0f32..100.0, 4),
            seed in any::<u64>()
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let optimizer = OptimizerWrapper::SGD(SGD::new());
            let mut critic = QNetwork::new(4, 2, 8, optimizer, &mut rng);

            let state = Array1::from_vec(entries);
            let action = array![0.5f32, -0.5];
            prop_assert!(critic.forward(state.view(), action.view()).is_finite());
        }
    }
}
